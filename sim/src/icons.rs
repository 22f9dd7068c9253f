use rand::Rng;

/// Non-empty list of icon resource identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct IconList {
    icons: Vec<String>,
}

impl IconList {
    /// Parse a comma-separated attribute. Entries are trimmed and empty
    /// entries dropped; if nothing remains, `default_icon` is used.
    pub fn parse(attr: Option<&str>, default_icon: &str) -> Self {
        let icons: Vec<String> = attr
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if icons.is_empty() {
            tracing::debug!("No usable icons configured, using {}", default_icon);
            return Self {
                icons: vec![default_icon.to_string()],
            };
        }
        Self { icons }
    }

    /// Uniform random pick.
    pub fn choose(&self, rng: &mut impl Rng) -> &str {
        &self.icons[rng.gen_range(0..self.icons.len())]
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[String] {
        &self.icons
    }
}
