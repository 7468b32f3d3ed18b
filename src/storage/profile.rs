//! Profile repository
//!
//! One JSON blob per identity, independent of the finance records.

use std::path::PathBuf;

use crate::error::FintrackError;
use crate::models::Profile;

use super::file_io::{read_json, write_json_atomic};

pub struct ProfileRepository {
    path: PathBuf,
}

impl ProfileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the profile, or an empty one if none has been saved
    pub fn load(&self) -> Result<Profile, FintrackError> {
        read_json(&self.path)
    }

    pub fn save(&self, profile: &Profile) -> Result<(), FintrackError> {
        write_json_atomic(&self.path, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_profile_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ProfileRepository::new(temp_dir.path().join("profile-guest.json"));

        assert!(repo.load().unwrap().is_empty());

        let profile = Profile {
            name: "Asha".into(),
            phone: "+91 98765 43210".into(),
            ..Profile::default()
        };
        repo.save(&profile).unwrap();
        assert_eq!(repo.load().unwrap(), profile);
    }
}
