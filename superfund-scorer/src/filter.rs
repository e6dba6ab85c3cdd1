//! Remove designated outlier sites from the scoring population.

use superfund_core::Site;

/// Return the sites whose `Site Name` matches none of `excluded_names`.
///
/// Matching is exact and case-sensitive. A sentinel that matches nothing is
/// not an error. The input slice is not modified.
#[must_use]
pub fn exclude_sites(sites: &[Site], excluded_names: &[String]) -> Vec<Site> {
    for name in excluded_names {
        let matches = sites.iter().filter(|site| &site.name == name).count();
        if matches == 0 {
            log::debug!("outlier sentinel {name:?} matched no site");
        } else {
            log::info!("excluding {matches} site(s) named {name:?} from scoring");
        }
    }
    sites
        .iter()
        .filter(|site| !excluded_names.contains(&site.name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};
    use rstest::{fixture, rstest};
    use superfund_core::DEFAULT_EXCLUDED_SITE;

    fn site(id: &str, name: &str) -> Site {
        Site::new(id, name, 10.0, Geometry::Point(Point::new(0.0, 0.0))).expect("valid site")
    }

    #[fixture]
    fn sites() -> Vec<Site> {
        vec![
            site("NYD001", "Gowanus Canal"),
            site("NYD002", DEFAULT_EXCLUDED_SITE),
            site("NJD003", "Diamond Alkali"),
        ]
    }

    #[rstest]
    fn removes_the_sentinel(sites: Vec<Site>) {
        let kept = exclude_sites(&sites, &[DEFAULT_EXCLUDED_SITE.to_owned()]);
        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["NYD001", "NJD003"]);
        assert_eq!(sites.len(), 3, "input must not be mutated");
    }

    #[rstest]
    fn absent_sentinel_is_a_no_op(sites: Vec<Site>) {
        let kept = exclude_sites(&sites, &["Love Canal".to_owned()]);
        assert_eq!(kept, sites);
    }

    #[rstest]
    #[case("hudson river pcbs")]
    #[case("Hudson River PCBs ")]
    fn matching_is_exact(sites: Vec<Site>, #[case] near_miss: &str) {
        let kept = exclude_sites(&sites, &[near_miss.to_owned()]);
        assert_eq!(kept.len(), 3);
    }
}
