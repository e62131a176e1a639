use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// The address a request appears to come from.
///
/// Behind a proxy this is the first hop of `X-Forwarded-For`, otherwise the
/// socket's peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedAddr(pub String);

impl ObservedAddr {
    /// Picks the address to advertise for the caller. One declared in the
    /// payload always wins.
    pub fn resolve(self, declared: Option<String>) -> String {
        declared
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .unwrap_or(self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ObservedAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(forwarded) = forwarded {
            return Ok(Self(forwarded.to_string()));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| Ipv4Addr::UNSPECIFIED.to_string());

        Ok(Self(peer))
    }
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;

    use axum::{
        extract::{ConnectInfo, FromRequestParts},
        http::Request,
    };

    use super::ObservedAddr;

    async fn observe(request: Request<()>) -> ObservedAddr {
        let (mut parts, _) = request.into_parts();

        ObservedAddr::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn prefers_the_first_forwarded_hop() {
        let mut request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("127.0.0.1:5000".parse::<SocketAddr>().unwrap()));

        assert_eq!(
            observe(request).await,
            ObservedAddr("203.0.113.7".to_string())
        );
    }

    #[tokio::test]
    async fn falls_back_to_the_socket_address() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("192.168.1.20:5000".parse::<SocketAddr>().unwrap()));

        assert_eq!(
            observe(request).await,
            ObservedAddr("192.168.1.20".to_string())
        );
    }

    #[test]
    fn declared_address_wins() {
        let observed = ObservedAddr("203.0.113.7".to_string());

        assert_eq!(
            observed.clone().resolve(Some("100.64.0.3".to_string())),
            "100.64.0.3"
        );
        assert_eq!(observed.clone().resolve(Some("  ".to_string())), "203.0.113.7");
        assert_eq!(observed.resolve(None), "203.0.113.7");
    }
}
