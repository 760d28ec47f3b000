//! Builder for the form posted to the gateway's payment page.

use chrono::{DateTime, TimeZone};
use error_stack::Report;

use crate::constants::{RESPOND_TYPE, VERSION};
use crate::error::GatewayError;
use crate::fields::{FieldSet, OutboundField};
use crate::settings::GatewayConfig;
use crate::signer::RequestSigner;

/// Outbound payment request for a single order.
///
/// `MerchantID`, `Version` and `RespondType` are filled in from the
/// configuration; the caller supplies the rest and finally calls
/// [`PaymentRequest::sign`].
#[derive(Debug, Clone)]
pub struct PaymentRequest<'a> {
    config: &'a GatewayConfig,
    fields: FieldSet,
}

impl<'a> PaymentRequest<'a> {
    #[must_use]
    pub fn new(config: &'a GatewayConfig, order_no: impl ToString, amount: u64) -> Self {
        let mut fields = FieldSet::new();
        fields.set(OutboundField::MerchantId, config.merchant_id());
        fields.set(OutboundField::Version, VERSION);
        fields.set(OutboundField::RespondType, RESPOND_TYPE);
        fields.set(OutboundField::MerchantOrderNo, order_no);
        fields.set(OutboundField::Amt, amount);

        Self { config, fields }
    }

    /// Sets an arbitrary outbound field.
    pub fn set(&mut self, field: OutboundField, value: impl ToString) -> &mut Self {
        self.fields.set(field, value);
        self
    }

    /// Stores `time` as epoch seconds in `TimeStamp`.
    pub fn time_stamp<Tz: TimeZone>(&mut self, time: &DateTime<Tz>) -> &mut Self {
        self.set(OutboundField::TimeStamp, time.timestamp())
    }

    pub fn item_desc(&mut self, description: &str) -> &mut Self {
        self.set(OutboundField::ItemDesc, description)
    }

    pub fn email(&mut self, email: &str) -> &mut Self {
        self.set(OutboundField::Email, email)
    }

    pub fn lang_type(&mut self, lang: &str) -> &mut Self {
        self.set(OutboundField::LangType, lang)
    }

    /// Seconds the buyer has to complete the payment page.
    pub fn trade_limit(&mut self, seconds: u32) -> &mut Self {
        self.set(OutboundField::TradeLimit, seconds)
    }

    /// Last payment day for offline methods, `YYYYMMDD`.
    pub fn expire_date(&mut self, date: chrono::NaiveDate) -> &mut Self {
        self.set(OutboundField::ExpireDate, date.format("%Y%m%d"))
    }

    pub fn return_url(&mut self, url: &str) -> &mut Self {
        self.set(OutboundField::ReturnUrl, url)
    }

    pub fn notify_url(&mut self, url: &str) -> &mut Self {
        self.set(OutboundField::NotifyUrl, url)
    }

    pub fn customer_url(&mut self, url: &str) -> &mut Self {
        self.set(OutboundField::CustomerUrl, url)
    }

    pub fn client_back_url(&mut self, url: &str) -> &mut Self {
        self.set(OutboundField::ClientBackUrl, url)
    }

    pub fn order_comment(&mut self, comment: &str) -> &mut Self {
        self.set(OutboundField::OrderComment, comment)
    }

    /// Enables or disables a payment method flag such as `CREDIT` or `VACC`.
    pub fn payment_method(&mut self, method: OutboundField, enabled: bool) -> &mut Self {
        self.set(method, u8::from(enabled))
    }

    #[must_use]
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    #[must_use]
    pub fn service_url(&self) -> &str {
        self.config.service_url()
    }

    /// Returns the form fields with `CheckValue` attached.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`] if `TimeStamp` was never set.
    pub fn sign(&self) -> Result<FieldSet, Report<GatewayError>> {
        RequestSigner::new(self.config).sign(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    use crate::constants::SANDBOX_SERVICE_URL;
    use crate::test_support::tests::{create_test_config, OUTBOUND_CHECK_VALUE};

    #[test]
    fn test_new_prefills_protocol_fields() {
        let config = create_test_config();
        let request = PaymentRequest::new(&config, "ORD1", 100);
        let fields = request.fields();

        assert_eq!(fields.field(OutboundField::MerchantId), Some("MID"));
        assert_eq!(fields.field(OutboundField::Version), Some("1.2"));
        assert_eq!(fields.field(OutboundField::RespondType), Some("String"));
        assert_eq!(fields.field(OutboundField::MerchantOrderNo), Some("ORD1"));
        assert_eq!(fields.field(OutboundField::Amt), Some("100"));
        assert_eq!(request.service_url(), SANDBOX_SERVICE_URL);
    }

    #[test]
    fn test_time_stamp_is_timezone_independent() {
        let config = create_test_config();
        let utc = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp");
        let taipei = utc.with_timezone(&FixedOffset::east_opt(8 * 3600).expect("valid offset"));

        let mut from_utc = PaymentRequest::new(&config, "ORD1", 100);
        from_utc.time_stamp(&utc);
        let mut from_taipei = PaymentRequest::new(&config, "ORD1", 100);
        from_taipei.time_stamp(&taipei);

        assert_eq!(
            from_utc.fields().field(OutboundField::TimeStamp),
            Some("1700000000")
        );
        assert_eq!(from_utc.fields(), from_taipei.fields());
    }

    #[test]
    fn test_sign_round_trip() {
        let config = create_test_config();
        let time = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp");

        let mut request = PaymentRequest::new(&config, "ORD1", 100);
        request
            .time_stamp(&time)
            .item_desc("Green tea")
            .email("buyer@example.com")
            .notify_url("https://shop.example.com/pay2go/notify")
            .payment_method(OutboundField::Credit, true)
            .payment_method(OutboundField::Vacc, false);

        let signed = request.sign().expect("should sign");
        assert_eq!(
            signed.field(OutboundField::CheckValue),
            Some(OUTBOUND_CHECK_VALUE)
        );
        assert_eq!(signed.field(OutboundField::Credit), Some("1"));
        assert_eq!(signed.field(OutboundField::Vacc), Some("0"));
        assert_eq!(signed.field(OutboundField::ItemDesc), Some("Green tea"));
    }

    #[test]
    fn test_sign_without_time_stamp_fails() {
        let config = create_test_config();
        let request = PaymentRequest::new(&config, "ORD1", 100);

        let err = request.sign().expect_err("should fail");
        assert!(matches!(
            err.current_context(),
            GatewayError::MissingField { field } if field == "TimeStamp"
        ));
    }

    #[test]
    fn test_expire_date_format() {
        let config = create_test_config();
        let mut request = PaymentRequest::new(&config, "ORD1", 100);
        request.expire_date(NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date"));
        assert_eq!(
            request.fields().field(OutboundField::ExpireDate),
            Some("20240105")
        );
    }
}
