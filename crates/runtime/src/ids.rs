//! Wall-clock bag instance ids.
use idle_core::{BagInstanceId, InstanceIdSource};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Issues `item:<unix-ms>_<suffix>` ids with a random lowercase suffix.
#[derive(Clone, Debug)]
pub struct ClockInstanceIds {
    suffix_len: usize,
}

impl ClockInstanceIds {
    pub const DEFAULT_SUFFIX_LEN: usize = 6;

    pub fn new() -> Self {
        Self {
            suffix_len: Self::DEFAULT_SUFFIX_LEN,
        }
    }
}

impl Default for ClockInstanceIds {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceIdSource for ClockInstanceIds {
    fn next_instance_id(&mut self, item_id: &str) -> BagInstanceId {
        let created_at = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.suffix_len)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        BagInstanceId::new(item_id, created_at, &suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_item_and_differ() {
        let mut ids = ClockInstanceIds::new();
        let a = ids.next_instance_id("pouch");
        let b = ids.next_instance_id("pouch");

        assert_eq!(a.item_id(), "pouch");
        assert!(a.as_str().starts_with("pouch:"));
        assert_ne!(a, b);
    }
}
