use serde::{Deserialize, Serialize};

/// The chart never shows more rows than this.
pub const CHART_LIMIT: usize = 10;

/// Counters returned by one `/sync` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncStats {
    pub processed: u64,
    pub inserted: u64,
    /// Seconds, exactly as reported by the backend.
    pub time_elapsed: f64,
}

impl SyncStats {
    pub fn summary(&self) -> String {
        format!(
            "Successfully processed {} emails from your inbox, adding {} new entries to your database in {:.2} seconds.",
            group_thousands(self.processed),
            group_thousands(self.inserted),
            self.time_elapsed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSender {
    pub email: String,
    pub count: u64,
}

/// A chart row: the sender plus its bar length relative to the largest count.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSender {
    pub email: String,
    pub count: u64,
    /// In `0.0..=1.0`.
    pub share: f64,
}

/// Sorts by count (descending, stable for ties), keeps the top
/// [`CHART_LIMIT`] and computes each bar's share of the maximum.
pub fn rank_senders(data: &[TopSender]) -> Vec<RankedSender> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(CHART_LIMIT);

    let max = sorted.first().map(|s| s.count).unwrap_or(0);

    sorted
        .into_iter()
        .map(|s| {
            // all-zero counts would divide by zero
            let share = if max == 0 {
                0.0
            } else {
                s.count as f64 / max as f64
            };
            RankedSender {
                email: s.email,
                count: s.count,
                share,
            }
        })
        .collect()
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(email: &str, count: u64) -> TopSender {
        TopSender {
            email: email.to_string(),
            count,
        }
    }

    #[test]
    fn ranks_descending_and_keeps_ten() {
        let data: Vec<TopSender> = (0..15)
            .map(|i| sender(&format!("s{i}@x.com"), (i * 7 % 13) as u64))
            .collect();

        let ranked = rank_senders(&data);

        assert_eq!(ranked.len(), CHART_LIMIT);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(ranked.windows(2).all(|w| w[0].share >= w[1].share));
        assert_eq!(ranked[0].share, 1.0);
    }

    #[test]
    fn ties_keep_backend_order() {
        let ranked = rank_senders(&[sender("a@x.com", 2), sender("b@x.com", 2)]);
        assert_eq!(ranked[0].email, "a@x.com");
        assert_eq!(ranked[1].email, "b@x.com");
    }

    #[test]
    fn empty_and_all_zero_inputs_do_not_divide_by_zero() {
        assert!(rank_senders(&[]).is_empty());

        let ranked = rank_senders(&[sender("a@x.com", 0), sender("b@x.com", 0)]);
        assert!(ranked.iter().all(|r| r.share == 0.0));
    }

    #[test]
    fn share_is_relative_to_max() {
        let ranked = rank_senders(&[sender("a@x.com", 5), sender("b@x.com", 10)]);
        assert_eq!(ranked[0].email, "b@x.com");
        assert_eq!(ranked[1].share, 0.5);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn summary_uses_two_decimals() {
        let s = SyncStats {
            processed: 1500,
            inserted: 12,
            time_elapsed: 3.14159,
        };
        assert_eq!(
            s.summary(),
            "Successfully processed 1,500 emails from your inbox, adding 12 new entries to your database in 3.14 seconds."
        );
    }
}
