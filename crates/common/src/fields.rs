//! Gateway field catalogue and the field set exchanged with the gateway.
//!
//! Field names are fixed by the gateway, so both directions are modelled as
//! closed enums whose wire names are checked at compile time. A [`FieldSet`]
//! is keyed by wire name so inbound callbacks may still carry fields this
//! catalogue does not know about.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Deserializer, Serialize};

/// A gateway-defined field name.
pub trait GatewayField: Copy + fmt::Debug {
    /// Name of the field on the wire.
    fn as_str(self) -> &'static str;
}

/// Returned when parsing a name that is not part of a field catalogue.
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("Unknown gateway field: {name}")]
pub struct UnknownField {
    pub name: String,
}

macro_rules! gateway_fields {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl GatewayField for $name {
            fn as_str(self) -> &'static str {
                $name::as_str(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownField {
                        name: other.to_string(),
                    }),
                }
            }
        }
    };
}

gateway_fields! {
    /// Fields accepted by the gateway's payment page.
    OutboundField {
        MerchantId => "MerchantID",
        LangType => "LangType",
        MerchantOrderNo => "MerchantOrderNo",
        Amt => "Amt",
        ItemDesc => "ItemDesc",
        TradeLimit => "TradeLimit",
        ExpireDate => "ExpireDate",
        ReturnUrl => "ReturnURL",
        NotifyUrl => "NotifyURL",
        CustomerUrl => "CustomerURL",
        ClientBackUrl => "ClientBackURL",
        Email => "Email",
        EmailModify => "EmailModify",
        LoginType => "LoginType",
        OrderComment => "OrderComment",
        Credit => "CREDIT",
        CreditRed => "CreditRed",
        InstFlag => "InstFlag",
        UnionPay => "UNIONPAY",
        WebAtm => "WEBATM",
        Vacc => "VACC",
        Cvs => "CVS",
        Barcode => "BARCODE",
        Custom => "CUSTOM",
        TokenTerm => "TokenTerm",
        Version => "Version",
        RespondType => "RespondType",
        TimeStamp => "TimeStamp",
        CheckValue => "CheckValue",
    }
}

gateway_fields! {
    /// Fields posted back by the gateway in an asynchronous notification.
    InboundField {
        Status => "Status",
        Message => "Message",
        MerchantId => "MerchantID",
        Amt => "Amt",
        TradeNo => "TradeNo",
        MerchantOrderNo => "MerchantOrderNo",
        PaymentType => "PaymentType",
        RespondType => "RespondType",
        CheckCode => "CheckCode",
        PayTime => "PayTime",
        Ip => "IP",
        EscrowBank => "EscrowBank",
        TokenUseStatus => "TokenUseStatus",
        RespondCode => "RespondCode",
        Auth => "Auth",
        Card6No => "Card6No",
        Card4No => "Card4No",
        Inst => "Inst",
        InstFirst => "InstFirst",
        InstEach => "InstEach",
        Eci => "ECI",
        PayBankCode => "PayBankCode",
        PayerAccount5Code => "PayerAccount5Code",
        CodeNo => "CodeNo",
        BankCode => "BankCode",
        Barcode1 => "Barcode_1",
        Barcode2 => "Barcode_2",
        Barcode3 => "Barcode_3",
        ExpireDate => "ExpireDate",
    }
}

/// Field name to value mapping for one request or notification.
///
/// Integer values are stored in their decimal string form, which is what the
/// gateway digests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: BTreeMap<String, String>,
}

impl FieldSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) -> Option<String> {
        self.fields.insert(name.into(), value.to_string())
    }

    /// Builder form of [`FieldSet::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn set<F: GatewayField>(&mut self, field: F, value: impl ToString) -> Option<String> {
        self.insert(field.as_str(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn field<F: GatewayField>(&self, field: F) -> Option<&str> {
        self.get(field.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses an `application/x-www-form-urlencoded` body. A repeated key keeps its last value.
    #[must_use]
    pub fn from_form_body(body: &str) -> Self {
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }

    /// Renders the set as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => f.write_str(s),
            RawValue::Integer(n) => write!(f, "{n}"),
            RawValue::Unsigned(n) => write!(f, "{n}"),
        }
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
