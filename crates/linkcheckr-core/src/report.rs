use std::collections::HashMap;

use serde::Serialize;

use crate::models::{LinkSet, ProbeResult};

/// Counts attached to every report. `working + broken == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub working: usize,
    pub broken: usize,
}

/// Final output of one link check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub url_checked: String,
    pub total_links: usize,
    pub working_links: Vec<ProbeResult>,
    pub broken_links: Vec<ProbeResult>,
    pub summary: Summary,
}

impl Report {
    /// Partitions `results` into working and broken links, keeping the
    /// input order inside each bucket.
    pub fn aggregate(url_checked: impl Into<String>, results: Vec<ProbeResult>) -> Self {
        let total = results.len();
        let (broken_links, working_links): (Vec<_>, Vec<_>) =
            results.into_iter().partition(ProbeResult::is_broken);

        let summary = Summary {
            total,
            working: working_links.len(),
            broken: broken_links.len(),
        };

        Self {
            url_checked: url_checked.into(),
            total_links: total,
            working_links,
            broken_links,
            summary,
        }
    }

    /// Like [`Report::aggregate`], but first puts `results` back into the
    /// order of `links`, whatever order the probes finished in.
    ///
    /// Results whose URL is not in `links` are placed after the known ones,
    /// in arrival order.
    pub fn from_link_set(
        url_checked: impl Into<String>,
        links: &LinkSet,
        results: Vec<ProbeResult>,
    ) -> Self {
        let position: HashMap<&str, usize> = links
            .iter()
            .enumerate()
            .map(|(i, link)| (link.as_str(), i))
            .collect();

        let mut ordered = results;
        ordered.sort_by_key(|r| position.get(r.url()).copied().unwrap_or(usize::MAX));

        Self::aggregate(url_checked, ordered)
    }

    pub fn has_broken_links(&self) -> bool {
        self.summary.broken > 0
    }
}
