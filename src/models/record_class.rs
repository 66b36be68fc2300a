//! Record classes: how each CSV export maps onto its target table.

use crate::models::coercion::Coercion;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

use Coercion::*;

/// The four record classes, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Accounts,
    SellerProfiles,
    Listings,
    Settings,
}

impl RecordKind {
    /// Import order. Profiles and listings reference account ids.
    pub const ORDER: [RecordKind; 4] = [
        RecordKind::Accounts,
        RecordKind::SellerProfiles,
        RecordKind::Listings,
        RecordKind::Settings,
    ];

    pub fn class(&self) -> &'static RecordClass {
        match self {
            RecordKind::Accounts => &ACCOUNTS,
            RecordKind::SellerProfiles => &SELLER_PROFILES,
            RecordKind::Listings => &LISTINGS,
            RecordKind::Settings => &SYSTEM_SETTINGS,
        }
    }

    /// Singular label used in per-record failure lines.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Accounts => "user",
            RecordKind::SellerProfiles => "seller profile",
            RecordKind::Listings => "listing",
            RecordKind::Settings => "setting",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Accounts => "users",
            RecordKind::SellerProfiles => "seller profiles",
            RecordKind::Listings => "listings",
            RecordKind::Settings => "system settings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// One source header mapped to one target column.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub source: &'static str,
    pub column: &'static str,
    pub coercion: Coercion,
}

const fn field(source: &'static str, coercion: Coercion) -> FieldSpec {
    FieldSpec {
        source,
        column: source,
        coercion,
    }
}

#[derive(Debug)]
pub struct RecordClass {
    pub kind: RecordKind,
    pub table: &'static str,
    /// Column the upsert conflicts on.
    pub conflict_key: &'static str,
    /// Source header holding the external identifier (for failure reports).
    pub id_field: &'static str,
    pub fields: &'static [FieldSpec],
    /// Columns overwritten when the row already exists.
    pub update_columns: &'static [&'static str],
}

impl RecordClass {
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }

    /// External identifier of a row for failure reports, or `"unknown"`.
    pub fn record_id<'a, F>(&self, cell: F) -> String
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        cell(self.id_field)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

pub const ROLE_REMAP: &[(&str, &str)] = &[("super_admin", "admin")];
pub const PRICE_TYPE_REMAP: &[(&str, &str)] = &[("auction", "offer")];

pub static ACCOUNTS: RecordClass = RecordClass {
    kind: RecordKind::Accounts,
    table: "users",
    conflict_key: "id",
    id_field: "id",
    fields: &[
        field("id", Int),
        field("openId", Passthrough),
        field("name", OptionalString),
        field("email", OptionalString),
        field("loginMethod", OptionalString),
        field("role", Remap(ROLE_REMAP)),
        field("nickname", OptionalString),
        field("location", OptionalString),
        field("profileImageUrl", OptionalString),
        field("isSellerActive", BoolFromInt { default: false }),
        field("ageVerified", BoolFromInt { default: false }),
        field("createdAt", Passthrough),
        field("updatedAt", Passthrough),
        field("lastSignedIn", Passthrough),
    ],
    update_columns: &[
        "name",
        "email",
        "nickname",
        "location",
        "profileImageUrl",
        "isSellerActive",
        "ageVerified",
        "updatedAt",
        "lastSignedIn",
    ],
};

pub static SELLER_PROFILES: RecordClass = RecordClass {
    kind: RecordKind::SellerProfiles,
    table: "sellerProfiles",
    conflict_key: "id",
    id_field: "id",
    fields: &[
        field("id", Int),
        field("userId", Int),
        field("shopName", Passthrough),
        field("description", OptionalString),
        field("location", OptionalString),
        field("profileImageUrl", OptionalString),
        field("verificationStatus", Passthrough),
        field("rating", FloatOrZero),
        field("totalReviews", IntOrZero),
        field("createdAt", Passthrough),
        field("updatedAt", Passthrough),
    ],
    update_columns: &[
        "shopName",
        "description",
        "location",
        "profileImageUrl",
        "updatedAt",
    ],
};

pub static LISTINGS: RecordClass = RecordClass {
    kind: RecordKind::Listings,
    table: "listings",
    conflict_key: "id",
    id_field: "id",
    fields: &[
        field("id", Int),
        field("sellerId", Int),
        field("type", Passthrough),
        field("strain", Passthrough),
        field("description", OptionalString),
        field("quantity", Int),
        field("priceType", Remap(PRICE_TYPE_REMAP)),
        field("fixedPrice", FloatOrNone),
        field("offerMinPrice", FloatOrNone),
        field("acceptsOffers", BoolFromInt { default: false }),
        field("imageUrl", OptionalString),
        field("images", OptionalString),
        // Unknown shipping state is treated as verified.
        field("shippingVerified", BoolFromInt { default: true }),
        field("shippingPickup", BoolFromInt { default: false }),
        field("status", Passthrough),
        field("genetics", OptionalString),
        field("seedBank", OptionalString),
        field("growMethod", OptionalString),
        field("seedType", OptionalString),
        field("thcContent", OptionalString),
        field("cbdContent", OptionalString),
        field("floweringTime", OptionalString),
        field("yieldInfo", OptionalString),
        field("flavorProfile", OptionalString),
        field("origin", OptionalString),
        field("createdAt", Passthrough),
        field("updatedAt", Passthrough),
    ],
    update_columns: &[
        "description",
        "quantity",
        "fixedPrice",
        "imageUrl",
        "images",
        "status",
        "updatedAt",
    ],
};

pub static SYSTEM_SETTINGS: RecordClass = RecordClass {
    kind: RecordKind::Settings,
    table: "systemSettings",
    conflict_key: "key",
    id_field: "key",
    fields: &[
        field("key", Passthrough),
        field("value", Passthrough),
        field("description", OptionalString),
        field("category", StringOr("general")),
        field("updatedAt", Passthrough),
    ],
    update_columns: &["value", "updatedAt"],
};
