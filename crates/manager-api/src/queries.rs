//! GraphQL documents.

pub const CREATE_CHANGE_PROFILE_MANAGERS_TYPED_DATA: &str = r#"
mutation CreateChangeProfileManagersTypedData(
  $options: TypedDataOptions
  $request: ChangeProfileManagersRequest!
) {
  createChangeProfileManagersTypedData(options: $options, request: $request) {
    id
    expiresAt
    typedData {
      domain {
        name
        chainId
        version
        verifyingContract
      }
      types {
        ChangeDelegatedExecutorsConfig {
          name
          type
        }
      }
      value {
        nonce
        deadline
        delegatorProfileId
        delegatedExecutors
        approvals
        configNumber
        switchToGivenConfig
      }
    }
  }
}
"#;

pub const BROADCAST_ONCHAIN: &str = r#"
mutation BroadcastOnchain($request: BroadcastRequest!) {
  broadcastOnchain(request: $request) {
    __typename
    ... on RelaySuccess {
      txHash
      txId
    }
    ... on RelayError {
      reason
    }
    ... on LensProfileManagerRelayError {
      reason
    }
  }
}
"#;

pub const PROFILE_MANAGERS: &str = r#"
query ProfileManagers($request: ProfileManagersRequest!) {
  profileManagers(request: $request) {
    items {
      address
      isLensManager
    }
    pageInfo {
      next
      prev
    }
  }
}
"#;

pub const USER_SIG_NONCES: &str = r#"
query UserSigNonces {
  userSigNonces {
    lensHubOnchainSigNonce
  }
}
"#;

pub const PROFILE: &str = r#"
query Profile($request: ProfileRequest!) {
  profile(request: $request) {
    id
    signless
    sponsor
    ownedBy {
      address
    }
  }
}
"#;
