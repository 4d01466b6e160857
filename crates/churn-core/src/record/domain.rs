//! Closed categorical domains
//!
//! Every categorical field of a record is one of these enums. The wire
//! values listed here are the only source of the schema's allowed sets.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declare a closed string domain with its wire values
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical! {
    Gender { Male => "male", Female => "female" }
}

categorical! {
    YesNo { Yes => "yes", No => "no" }
}

categorical! {
    MultipleLines {
        Yes => "yes",
        No => "no",
        NoPhoneService => "no_phone_service",
    }
}

categorical! {
    InternetService {
        Dsl => "dsl",
        FiberOptic => "fiber_optic",
        No => "no",
    }
}

categorical! {
    /// Add-on services that require an internet subscription
    InternetAddon {
        No => "no",
        Yes => "yes",
        NoInternetService => "no_internet_service",
    }
}

categorical! {
    Contract {
        MonthToMonth => "month-to-month",
        OneYear => "one_year",
        TwoYear => "two_year",
    }
}

categorical! {
    PaymentMethod {
        ElectronicCheck => "electronic_check",
        MailedCheck => "mailed_check",
        BankTransfer => "bank_transfer_(automatic)",
        CreditCard => "credit_card_(automatic)",
    }
}

categorical! {
    LeadSource {
        PaidAds => "paid_ads",
        SocialMedia => "social_media",
        Events => "events",
        Referral => "referral",
        OrganicSearch => "organic_search",
        Unknown => "NA",
    }
}

/// Senior citizen flag, encoded on the wire as the integer 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeniorCitizen {
    No,
    Yes,
}

impl SeniorCitizen {
    /// Every accepted wire value
    pub const VALUES: &'static [i64] = &[0, 1];

    pub fn as_i64(&self) -> i64 {
        match self {
            SeniorCitizen::No => 0,
            SeniorCitizen::Yes => 1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(SeniorCitizen::No),
            1 => Some(SeniorCitizen::Yes),
            _ => None,
        }
    }
}

impl fmt::Display for SeniorCitizen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl Serialize for SeniorCitizen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for SeniorCitizen {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        SeniorCitizen::from_i64(value)
            .ok_or_else(|| de::Error::custom(format!("seniorcitizen must be 0 or 1, got {}", value)))
    }
}
