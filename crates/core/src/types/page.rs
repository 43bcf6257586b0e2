//! Storefront navigation pages.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a page slug is not one of the known pages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown page: {0}")]
pub struct ParsePageError(pub String);

/// Every page the storefront can show. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Products,
    ProductDetail,
    Cart,
    Checkout,
    MyAccount,
    Signin,
    ForgotPassword,
    RequestAccount,
}

impl Page {
    /// All pages, in navigation order.
    pub const ALL: [Self; 9] = [
        Self::Home,
        Self::Products,
        Self::ProductDetail,
        Self::Cart,
        Self::Checkout,
        Self::MyAccount,
        Self::Signin,
        Self::ForgotPassword,
        Self::RequestAccount,
    ];

    /// Kebab-case slug, e.g. `product-detail`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Products => "products",
            Self::ProductDetail => "product-detail",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::MyAccount => "my-account",
            Self::Signin => "signin",
            Self::ForgotPassword => "forgot-password",
            Self::RequestAccount => "request-account",
        }
    }

    /// Sign-in style pages render without the site header.
    #[must_use]
    pub const fn shows_header(self) -> bool {
        !matches!(
            self,
            Self::Signin | Self::ForgotPassword | Self::RequestAccount
        )
    }

    /// Document title for the page.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Products => "Products",
            Self::ProductDetail => "Product",
            Self::Cart => "Shopping Cart",
            Self::Checkout => "Secure Checkout",
            Self::MyAccount => "My Account",
            Self::Signin => "Sign In",
            Self::ForgotPassword => "Forgot Password",
            Self::RequestAccount => "Request Account",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = ParsePageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.slug() == s)
            .ok_or_else(|| ParsePageError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_parse_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.slug().parse::<Page>().unwrap(), page);
        }
    }

    #[test]
    fn test_serde_uses_slug() {
        assert_eq!(
            serde_json::to_string(&Page::ProductDetail).unwrap(),
            "\"product-detail\""
        );
        assert_eq!(
            serde_json::from_str::<Page>("\"my-account\"").unwrap(),
            Page::MyAccount
        );
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(
            "admin".parse::<Page>(),
            Err(ParsePageError("admin".to_owned()))
        );
    }

    #[test]
    fn test_auth_pages_hide_header() {
        let hidden: Vec<Page> = Page::ALL
            .into_iter()
            .filter(|page| !page.shows_header())
            .collect();
        assert_eq!(
            hidden,
            vec![Page::Signin, Page::ForgotPassword, Page::RequestAccount]
        );
    }
}
