//! Common types used across CLI modules

use clap::ValueEnum;
use dpaguard_core::domain::review::ReviewId;
use dpaguard_core::intake::{CompanyRole, Region, VendorType};
use uuid::Uuid;

/// Parses a review id given on the command line
///
/// Review ids are UUIDs; anything else is rejected before a request is made.
pub fn parse_review_id(input: &str) -> Result<ReviewId, String> {
    Uuid::parse_str(input.trim())
        .map(ReviewId::from)
        .map_err(|_| format!("'{}' is not a valid review id (expected a UUID)", input))
}

/// Company role accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Controller,
    Processor,
}

impl From<RoleArg> for CompanyRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Controller => CompanyRole::Controller,
            RoleArg::Processor => CompanyRole::Processor,
        }
    }
}

/// Processing region accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegionArg {
    Eu,
    Uk,
    Us,
    Other,
}

impl From<RegionArg> for Region {
    fn from(region: RegionArg) -> Self {
        match region {
            RegionArg::Eu => Region::Eu,
            RegionArg::Uk => Region::Uk,
            RegionArg::Us => Region::Us,
            RegionArg::Other => Region::Other,
        }
    }
}

/// Vendor type accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VendorArg {
    Saas,
    Cloud,
    Marketing,
    Hr,
    Payments,
    Other,
}

impl From<VendorArg> for VendorType {
    fn from(vendor: VendorArg) -> Self {
        match vendor {
            VendorArg::Saas => VendorType::Saas,
            VendorArg::Cloud => VendorType::Cloud,
            VendorArg::Marketing => VendorType::Marketing,
            VendorArg::Hr => VendorType::Hr,
            VendorArg::Payments => VendorType::Payments,
            VendorArg::Other => VendorType::Other,
        }
    }
}
