//! The generated dataset: merchant profiles plus their volume series.
//!
//! Read-only once built. Volume rows are stored grouped by merchant in
//! profile order, twelve per merchant, oldest month first.

use crate::{
    error::{GenError, GenResult},
    model::{MerchantProfile, MonthlyVolumeRecord},
    types::{Volume, SERIES_MONTHS},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub generated_on: NaiveDate,
    /// Seed of the stream the dataset was drawn from.
    pub seed:         u64,
    profiles:         Vec<MerchantProfile>,
    volumes:          Vec<MonthlyVolumeRecord>,
}

impl Dataset {
    pub fn new(
        generated_on: NaiveDate,
        seed: u64,
        profiles: Vec<MerchantProfile>,
        volumes: Vec<MonthlyVolumeRecord>,
    ) -> GenResult<Self> {
        let dataset = Self { generated_on, seed, profiles, volumes };
        dataset.check_layout()?;
        Ok(dataset)
    }

    pub fn profiles(&self) -> &[MerchantProfile] {
        &self.profiles
    }

    pub fn volumes(&self) -> &[MonthlyVolumeRecord] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profile(&self, merchant_id: &str) -> Option<&MerchantProfile> {
        self.profiles.iter().find(|p| p.merchant_id == merchant_id)
    }

    /// Lookup by display name, as picked from the dashboard's merchant list.
    pub fn profile_by_name(&self, merchant_name: &str) -> Option<&MerchantProfile> {
        self.profiles.iter().find(|p| p.merchant_name == merchant_name)
    }

    /// The twelve volume rows owned by a merchant, oldest first.
    pub fn volumes_for(&self, merchant_id: &str) -> Option<&[MonthlyVolumeRecord]> {
        let index = self.profiles.iter().position(|p| p.merchant_id == merchant_id)?;
        let start = index * SERIES_MONTHS;
        self.volumes.get(start..start + SERIES_MONTHS)
    }

    /// Just the volume values for a merchant, oldest first.
    pub fn series_for(&self, merchant_id: &str) -> Option<Vec<Volume>> {
        self.volumes_for(merchant_id)
            .map(|rows| rows.iter().map(|r| r.volume).collect())
    }

    pub fn to_json(&self) -> GenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> GenResult<Self> {
        let dataset: Self = serde_json::from_str(content)?;
        dataset.check_layout()?;
        Ok(dataset)
    }

    fn check_layout(&self) -> GenResult<()> {
        let expected = self.profiles.len() * SERIES_MONTHS;
        if self.volumes.len() != expected {
            return Err(GenError::InvalidArgument {
                name: "volumes",
                reason: format!(
                    "expected {expected} rows for {} merchants, got {}",
                    self.profiles.len(),
                    self.volumes.len()
                ),
            });
        }
        for (profile, rows) in self.profiles.iter().zip(self.volumes.chunks(SERIES_MONTHS)) {
            if let Some(stray) = rows.iter().find(|r| r.merchant_id != profile.merchant_id) {
                return Err(GenError::InvalidArgument {
                    name: "volumes",
                    reason: format!(
                        "row for {} found in the series of {}",
                        stray.merchant_id, profile.merchant_id
                    ),
                });
            }
        }
        Ok(())
    }
}
