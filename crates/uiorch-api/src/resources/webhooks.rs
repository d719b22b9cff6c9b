// Webhook endpoints and delivery verification
//
// Orchestrator signs each delivery with HMAC-SHA256 over the raw request
// body, keyed by the webhook's secret, and sends the base64 digest in the
// `X-UiPath-Signature` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{NewWebhook, Webhook, WebhookEvent, WebhookEventType};
use crate::odata::ODataList;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-UiPath-Signature";

const WEBHOOKS: &str = "odata/Webhooks";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks { client: self }
    }
}

impl Webhooks<'_> {
    /// `GET odata/Webhooks`
    pub async fn list(&self) -> Result<ODataList<Webhook>, Error> {
        debug!("listing webhooks");
        self.client.get(WEBHOOKS).await
    }

    /// `GET odata/Webhooks({id})`
    pub async fn get(&self, id: i64) -> Result<Webhook, Error> {
        self.client.get(&format!("{WEBHOOKS}({id})")).await
    }

    /// `POST odata/Webhooks`
    pub async fn create(&self, webhook: &NewWebhook) -> Result<Webhook, Error> {
        webhook.validate()?;
        debug!(name = %webhook.name, url = %webhook.url, "creating webhook");
        self.client.post(WEBHOOKS, webhook).await
    }

    /// `PUT odata/Webhooks({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating webhook");
        self.client.put_no_response(&format!("{WEBHOOKS}({id})"), body).await
    }

    /// `DELETE odata/Webhooks({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting webhook");
        self.client.delete(&format!("{WEBHOOKS}({id})")).await
    }

    /// Event types a webhook can subscribe to.
    ///
    /// `GET odata/Webhooks/UiPath.Server.Configuration.OData.GetEventTypes`
    pub async fn event_types(&self) -> Result<ODataList<WebhookEventType>, Error> {
        self.client
            .get(&format!("{WEBHOOKS}/UiPath.Server.Configuration.OData.GetEventTypes"))
            .await
    }

    /// Ask Orchestrator to send a ping delivery to the webhook.
    ///
    /// `POST odata/Webhooks({id})/UiPath.Server.Configuration.OData.Ping`
    pub async fn ping(&self, id: i64) -> Result<Option<serde_json::Value>, Error> {
        debug!(id, "pinging webhook");
        self.client
            .post_optional(
                &format!("{WEBHOOKS}({id})/UiPath.Server.Configuration.OData.Ping"),
                &serde_json::json!({}),
            )
            .await
    }
}

// ── Delivery verification ───────────────────────────────────────────

fn mac(secret: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length; new_from_slice cannot fail for it.
    match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
    }
}

/// Compute the `X-UiPath-Signature` value for `body`.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = mac(secret);
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Check a delivery's signature in constant time.
///
/// Fails with [`Error::InvalidSignature`] when the header is not valid
/// base64 or does not match the body.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> Result<(), Error> {
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| Error::InvalidSignature)?;
    let mut mac = mac(secret);
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| Error::InvalidSignature)
}

/// Verify a delivery and decode its payload.
pub fn parse_event(secret: &[u8], body: &[u8], signature: &str) -> Result<WebhookEvent, Error> {
    verify_signature(secret, body, signature)?;
    serde_json::from_slice(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (webhook payload)"),
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"s3cr3t";
    const BODY: &[u8] = br#"{"Type":"job.faulted","EventId":"e-1","TenantId":1}"#;

    #[test]
    fn signature_round_trip() {
        let sig = sign(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &sig).is_ok());
    }

    #[test]
    fn tampered_body_or_wrong_secret_is_rejected() {
        let sig = sign(SECRET, BODY);
        assert!(matches!(
            verify_signature(SECRET, b"{}", &sig),
            Err(Error::InvalidSignature)
        ));
        assert!(matches!(
            verify_signature(b"other", BODY, &sig),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_base64_is_rejected() {
        assert!(matches!(
            verify_signature(SECRET, BODY, "not base64!!"),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn parse_event_decodes_verified_payload() {
        let sig = sign(SECRET, BODY);
        let event = parse_event(SECRET, BODY, &sig).unwrap();
        assert_eq!(event.event_type, "job.faulted");
        assert_eq!(event.event_id, "e-1");
        assert_eq!(event.tenant_id, Some(1));
    }
}
