//! Sender-side metrics recording (spec.md §4.8).
//!
//! Samples are appended under the same lock that guards the congestion
//! controller, so no separate synchronization is needed here; this type is
//! plain data plus the two-file CSV serialization the Python reference
//! (`save_metrics`) uses.

use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Metrics {
    /// (rtt_index, cwnd) appended on each new cumulative ACK.
    pub cwnd_history: Vec<(u64, u32)>,
    /// (elapsed_secs, total_retransmissions) appended on each retransmission.
    pub retransmission_history: Vec<(f64, u64)>,
    pub timeout_retransmissions: u64,
    pub fast_retransmissions: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_retransmissions(&self) -> u64 {
        self.timeout_retransmissions + self.fast_retransmissions
    }

    pub fn record_cwnd_sample(&mut self, elapsed: std::time::Duration, srtt_secs: f64, cwnd: u32) {
        let rtt_index = if srtt_secs > 0.0 {
            (elapsed.as_secs_f64() / srtt_secs) as u64
        } else {
            0
        };
        self.cwnd_history.push((rtt_index, cwnd));
    }

    pub fn record_timeout_retransmission(&mut self, elapsed: std::time::Duration) {
        self.timeout_retransmissions += 1;
        self.push_retransmission_sample(elapsed);
    }

    pub fn record_fast_retransmission(&mut self, elapsed: std::time::Duration) {
        self.fast_retransmissions += 1;
        self.push_retransmission_sample(elapsed);
    }

    fn push_retransmission_sample(&mut self, elapsed: std::time::Duration) {
        self.retransmission_history
            .push((elapsed.as_secs_f64(), self.total_retransmissions()));
    }

    /// Writes `<prefix>_cwnd.txt` and `<prefix>_retransmissions.txt`.
    pub fn save(&self, prefix: &str) -> std::io::Result<()> {
        let cwnd_path = format!("{prefix}_cwnd.txt");
        let mut cwnd_file = std::fs::File::create(Path::new(&cwnd_path))?;
        writeln!(cwnd_file, "RTT,cwnd")?;
        for (rtt, cwnd) in &self.cwnd_history {
            writeln!(cwnd_file, "{rtt},{cwnd}")?;
        }

        let retrans_path = format!("{prefix}_retransmissions.txt");
        let mut retrans_file = std::fs::File::create(Path::new(&retrans_path))?;
        writeln!(retrans_file, "time,retransmissions")?;
        for (t, count) in &self.retransmission_history {
            writeln!(retrans_file, "{t},{count}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_timeout_and_fast() {
        let mut m = Metrics::new();
        m.record_timeout_retransmission(std::time::Duration::from_secs(1));
        m.record_fast_retransmission(std::time::Duration::from_secs(2));
        assert_eq!(m.total_retransmissions(), 2);
        assert_eq!(m.retransmission_history.last(), Some(&(2.0, 2)));
    }

    #[test]
    fn cwnd_sample_uses_rtt_index() {
        let mut m = Metrics::new();
        m.record_cwnd_sample(std::time::Duration::from_millis(250), 0.1, 5);
        assert_eq!(m.cwnd_history, vec![(2, 5)]);
    }
}
