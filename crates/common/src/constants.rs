use crate::fields::{InboundField, OutboundField};

/// Protocol version sent in the `Version` field.
pub const VERSION: &str = "1.2";

/// Response format requested from the gateway in `RespondType`.
pub const RESPOND_TYPE: &str = "String";

/// `Status` value reported for a paid transaction.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// `Status` value reported for a transaction finished through a custom flow.
pub const STATUS_CUSTOM: &str = "CUSTOM";

/// Fields covered by `CheckValue` on the outbound request.
pub const CHECK_VALUE_FIELDS: [OutboundField; 5] = [
    OutboundField::Amt,
    OutboundField::MerchantId,
    OutboundField::MerchantOrderNo,
    OutboundField::TimeStamp,
    OutboundField::Version,
];

/// Fields covered by `CheckCode` on the inbound notification.
pub const CHECK_CODE_FIELDS: [InboundField; 4] = [
    InboundField::Amt,
    InboundField::MerchantId,
    InboundField::MerchantOrderNo,
    InboundField::TradeNo,
];

pub const PRODUCTION_SERVICE_URL: &str = "https://api.pay2go.com/MPG/mpg_gateway";
pub const SANDBOX_SERVICE_URL: &str = "https://capi.pay2go.com/MPG/mpg_gateway";

pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "PAY2GO";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";
