/// Version metadata stamped into the binary by `build.rs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_date: Option<&'static str>,
    pub git_sha: Option<&'static str>,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)?;
        if let Some(date) = self.build_date {
            write!(f, " {date}")?;
        }
        if let Some(sha) = self.git_sha {
            let short = sha.get(..8).unwrap_or(sha);
            write!(f, " ({short})")?;
        }
        Ok(())
    }
}
