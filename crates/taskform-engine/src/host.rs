use serde::{Deserialize, Serialize};
use url::Url;

/// What the host application knows about the current user and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostContext {
  /// Whether a user is signed in. Buttons ask for a login otherwise.
  pub has_session: bool,

  /// Wallet addresses of the signed-in user.
  pub wallets: Vec<String>,

  /// Base url of a block explorer, e.g. `https://etherscan.io`.
  pub explorer_url: Option<String>,
}

impl HostContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_session(mut self, has_session: bool) -> Self {
    self.has_session = has_session;
    self
  }

  pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
    self.wallets.push(address.into());
    self
  }

  pub fn with_explorer_url(mut self, url: impl Into<String>) -> Self {
    self.explorer_url = Some(url.into());
    self
  }

  /// Explorer page for a hash, e.g. `{explorer}/tx/{hash}`.
  ///
  /// Returns `None` when no explorer is configured or its url is invalid.
  pub fn explorer_link(&self, kind: &str, hash: &str) -> Option<String> {
    let mut url = Url::parse(self.explorer_url.as_deref()?).ok()?;
    url
      .path_segments_mut()
      .ok()?
      .pop_if_empty()
      .push(kind)
      .push(hash);
    Some(url.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_explorer_link() {
    let host = HostContext::new().with_explorer_url("https://etherscan.io/");
    assert_eq!(
      host.explorer_link("tx", "0xabc").as_deref(),
      Some("https://etherscan.io/tx/0xabc")
    );

    let host = HostContext::new().with_explorer_url("https://scan.example/base");
    assert_eq!(
      host.explorer_link("address", "0x1").as_deref(),
      Some("https://scan.example/base/address/0x1")
    );
  }

  #[test]
  fn test_explorer_link_without_explorer() {
    assert_eq!(HostContext::new().explorer_link("tx", "0xabc"), None);
    let host = HostContext::new().with_explorer_url("not a url");
    assert_eq!(host.explorer_link("tx", "0xabc"), None);
  }
}
