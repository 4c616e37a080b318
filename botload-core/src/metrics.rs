/// Metric names recorded for a single transaction.
#[derive(Copy, Clone, Debug)]
pub struct TransactionLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

impl TransactionLabels {
    /// Labels for transactions which should not show up in metrics.
    pub const fn unlabeled() -> Self {
        Self {
            success: "",
            error: "",
            latency: "",
        }
    }

    pub fn is_unlabeled(&self) -> bool {
        self.success.is_empty() && self.error.is_empty() && self.latency.is_empty()
    }
}

#[macro_export]
macro_rules! generate_labels {
    ($base_name:expr) => {
        ::botload::core::TransactionLabels {
            success: concat!(stringify!($base_name), "_success"),
            error: concat!(stringify!($base_name), "_error"),
            latency: concat!(stringify!($base_name), "_latency"),
        }
    };
}
