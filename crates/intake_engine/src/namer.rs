use rand::distributions::Alphanumeric;
use rand::Rng;

/// Collision-tolerant generator of display names and name suffixes.
pub trait RandomNamer: Send + Sync {
    fn random_name(&self) -> String;
}

/// Default namer: `dl-` plus a short lowercase alphanumeric token.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericNamer;

impl RandomNamer for AlphanumericNamer {
    fn random_name(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!("dl-{}", token.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_never_empty() {
        let namer = AlphanumericNamer;
        for _ in 0..32 {
            let name = namer.random_name();
            assert!(name.starts_with("dl-"));
            assert_eq!(name.len(), 9);
        }
    }
}
