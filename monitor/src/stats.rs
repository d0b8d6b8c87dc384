//! ドメイン別稼働率集計
//!
//! プロセス起動からの累積値を保持する。カウンタは増加のみで、
//! リセットや削除は行わない。

use endpoint_monitor_common::types::{Domain, HealthVerdict};
use std::collections::BTreeMap;

/// ドメイン単位の集計値（`up <= total` を常に満たす）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    up: u64,
    total: u64,
}

impl DomainStats {
    /// UP判定の累積回数
    pub fn up(&self) -> u64 {
        self.up
    }

    /// チェックの累積回数
    pub fn total(&self) -> u64 {
        self.total
    }

    /// 稼働率（%、切り捨て）。一度も記録が無い場合は`None`
    pub fn availability(&self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        Some(100 * self.up / self.total)
    }

    fn record(&mut self, verdict: HealthVerdict) {
        self.total += 1;
        if verdict.is_up() {
            self.up += 1;
        }
    }
}

/// ドメイン別稼働率アグリゲーター
///
/// 監視ループが単独で所有し、書き込みは常に1タスクから行われる。
#[derive(Debug, Clone, Default)]
pub struct AvailabilityStats {
    domains: BTreeMap<Domain, DomainStats>,
}

impl AvailabilityStats {
    /// 空の集計を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 判定結果を記録（初めて見るドメインはここで作成される）
    pub fn record(&mut self, domain: Domain, verdict: HealthVerdict) {
        self.domains.entry(domain).or_default().record(verdict);
    }

    /// ドメインの稼働率（%、切り捨て）
    ///
    /// 記録の無いドメインは`None`。
    pub fn availability(&self, domain: &Domain) -> Option<u64> {
        self.domains.get(domain).and_then(DomainStats::availability)
    }

    /// ドメインの集計値を取得
    pub fn get(&self, domain: &Domain) -> Option<DomainStats> {
        self.domains.get(domain).copied()
    }

    /// ドメイン順に集計値を列挙
    pub fn iter(&self) -> impl Iterator<Item = (&Domain, &DomainStats)> {
        self.domains.iter()
    }

    /// 集計済みドメイン数
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// 集計済みドメインが無いかどうか
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn domain(host: &str) -> Domain {
        Domain::host(host)
    }

    #[test]
    fn test_three_up_one_down_is_75() {
        let mut stats = AvailabilityStats::new();
        let d = domain("d");
        stats.record(d.clone(), HealthVerdict::Up);
        stats.record(d.clone(), HealthVerdict::Up);
        stats.record(d.clone(), HealthVerdict::Down);
        stats.record(d.clone(), HealthVerdict::Up);

        assert_eq!(stats.availability(&d), Some(75));
        assert_eq!(stats.get(&d).map(|s| (s.up(), s.total())), Some((3, 4)));
    }

    #[test]
    fn test_availability_rounds_down() {
        let mut stats = AvailabilityStats::new();
        let d = domain("d");
        stats.record(d.clone(), HealthVerdict::Up);
        stats.record(d.clone(), HealthVerdict::Up);
        stats.record(d.clone(), HealthVerdict::Down);

        // 66.66... → 66
        assert_eq!(stats.availability(&d), Some(66));
    }

    #[test]
    fn test_unknown_domain_has_no_availability() {
        let stats = AvailabilityStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.availability(&domain("never-seen")), None);
        assert_eq!(DomainStats::default().availability(), None);
    }

    #[test]
    fn test_domains_are_created_lazily_and_kept_separate() {
        let mut stats = AvailabilityStats::new();
        stats.record(domain("a.com"), HealthVerdict::Up);
        stats.record(Domain::Unknown, HealthVerdict::Down);
        stats.record(domain("a.com"), HealthVerdict::Down);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.availability(&domain("a.com")), Some(50));
        // ホスト不明のURLも独立したキーで集計される
        assert_eq!(stats.availability(&Domain::Unknown), Some(0));
    }

    #[test]
    fn test_iter_is_sorted_by_domain() {
        let mut stats = AvailabilityStats::new();
        stats.record(Domain::Unknown, HealthVerdict::Up);
        stats.record(domain("b.com"), HealthVerdict::Up);
        stats.record(domain("a.com"), HealthVerdict::Up);

        let keys: Vec<String> = stats.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(keys, ["a.com", "b.com", "<unknown>"]);
    }

    proptest! {
        #[test]
        fn prop_counters_are_consistent_and_monotonic(
            records in prop::collection::vec((0usize..3, any::<bool>()), 0..200)
        ) {
            let domains = [domain("a.com"), domain("b.com"), Domain::Unknown];
            let mut stats = AvailabilityStats::new();
            let mut calls = [0u64; 3];
            let mut ups = [0u64; 3];

            for (idx, up) in records {
                let before = stats.get(&domains[idx]).unwrap_or_default();
                let verdict = if up { HealthVerdict::Up } else { HealthVerdict::Down };
                stats.record(domains[idx].clone(), verdict);
                calls[idx] += 1;
                if up {
                    ups[idx] += 1;
                }

                let after = stats.get(&domains[idx]).unwrap();
                prop_assert!(after.up() <= after.total());
                prop_assert!(after.up() >= before.up());
                prop_assert_eq!(after.total(), before.total() + 1);
                prop_assert_eq!(after.total(), calls[idx]);
                prop_assert_eq!(after.up(), ups[idx]);

                let pct = stats.availability(&domains[idx]).unwrap();
                prop_assert!(pct <= 100);
            }
        }
    }
}
