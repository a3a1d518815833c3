use crate::config::Config;
use crate::placeholder::PlaceholderGrid;
use crate::provider::{
    load_calendar, CalendarModel, ContributionSource, FileContributions, GithubContributions,
    Result,
};
use crate::stats::{GithubProfile, ProfileStats};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Result of one complete load, replacing whatever was shown before.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub model: CalendarModel,
    /// Only present when real data was loaded.
    pub stats: Option<ProfileStats>,
}

impl Snapshot {
    pub fn placeholder() -> Self {
        Snapshot {
            model: CalendarModel::Placeholder(PlaceholderGrid::random()),
            stats: None,
        }
    }
}

pub struct Loader {
    source: Box<dyn ContributionSource>,
    profile: Option<GithubProfile>,
}

impl Loader {
    pub fn new(source: Box<dyn ContributionSource>, profile: Option<GithubProfile>) -> Self {
        Loader { source, profile }
    }

    /// Saved response from `input` if given, otherwise the GitHub calendar
    /// of `user`.
    pub fn from_config(config: &Config, user: Option<&str>, input: Option<&Path>) -> Result<Self> {
        if let Some(path) = input {
            return Ok(Loader::new(Box::new(FileContributions::new(path)), None));
        }

        let user = config.resolve_user(user)?;
        let source = GithubContributions::from_config(config, user)?;
        let profile = if config.fetch_stats {
            Some(GithubProfile::from_config(config, user)?)
        } else {
            None
        };

        Ok(Loader::new(Box::new(source), profile))
    }

    pub fn load(&self) -> Snapshot {
        let loaded = load_calendar(self.source.as_ref());

        let stats = loaded.response.as_ref().map(|response| {
            let stats = ProfileStats::from_response(response);
            match &self.profile {
                Some(profile) => stats.with_profile(profile),
                None => stats,
            }
        });

        Snapshot {
            model: loaded.model,
            stats,
        }
    }

    /// Like [`Loader::load`], but a panicking source yields a placeholder
    /// instead of tearing down the calling thread.
    pub fn load_or_placeholder(&self) -> Snapshot {
        panic::catch_unwind(AssertUnwindSafe(|| self.load())).unwrap_or_else(|_| {
            log::error!("Loading contributions panicked, showing placeholder");
            Snapshot::placeholder()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::github::canned_http::serve;
    use crate::provider::ContributionResponse;
    use std::io::Write;

    struct Exploding;

    impl ContributionSource for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn fetch(&self) -> Result<ContributionResponse> {
            panic!("source blew up")
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"total": {{"lastYear": 3}}, "contributions": [{{"date": "2024-01-03", "count": 3}}]}}"#
        )
        .unwrap();

        let loader = Loader::from_config(&Config::default(), None, Some(file.path())).unwrap();
        let snapshot = loader.load();

        assert!(matches!(snapshot.model, CalendarModel::Contributions(_)));
        assert_eq!(snapshot.stats.unwrap().total_contributions, 3);
    }

    #[test]
    fn unreadable_file_shows_placeholder_without_stats() {
        let dir = tempfile::tempdir().unwrap();
        let loader =
            Loader::from_config(&Config::default(), None, Some(&dir.path().join("x.json")))
                .unwrap();
        let snapshot = loader.load();

        assert!(snapshot.model.is_placeholder());
        assert!(snapshot.stats.is_none());
    }

    #[test]
    fn network_source_needs_user() {
        assert!(Loader::from_config(&Config::default(), None, None).is_err());
        assert!(Loader::from_config(&Config::default(), Some("octocat"), None).is_ok());
    }

    #[test]
    fn loads_calendar_and_profile_over_http() {
        let base = serve(vec![
            (
                200,
                r#"{"total": {"lastYear": 12}, "contributions": [{"date": "2024-01-03", "count": 12}]}"#,
            ),
            (200, r#"{"public_repos": 3}"#),
            (200, r#"[{"stargazers_count": 9}]"#),
        ]);
        let mut config = Config::default();
        config.contributions_api = base.clone();
        config.github_api = base;

        let snapshot = Loader::from_config(&config, Some("octocat"), None)
            .unwrap()
            .load();

        assert!(matches!(snapshot.model, CalendarModel::Contributions(_)));
        assert_eq!(
            snapshot.stats,
            Some(ProfileStats {
                total_contributions: 12,
                public_repos: Some(3),
                stars: Some(9),
            })
        );
    }

    #[test]
    fn failed_fetch_skips_profile() {
        // Only the calendar request is answered, profile requests would be refused
        let base = serve(vec![(404, "Not Found")]);
        let mut config = Config::default();
        config.contributions_api = base.clone();
        config.github_api = base;

        let snapshot = Loader::from_config(&config, Some("octocat"), None)
            .unwrap()
            .load();

        assert!(snapshot.model.is_placeholder());
        assert!(snapshot.stats.is_none());
    }

    #[test]
    fn panicking_source_yields_placeholder() {
        let loader = Loader::new(Box::new(Exploding), None);
        let snapshot = loader.load_or_placeholder();

        assert!(snapshot.model.is_placeholder());
        assert!(snapshot.stats.is_none());
    }
}
