//! Statement metrics and tracing helpers.
//!
//! Metrics are recorded through the global OpenTelemetry meter provider; wiring
//! an exporter is left to the application.

#[cfg(feature = "metrics")]
pub use otel::{StatementMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
    };
    use std::time::Duration;

    pub static METRICS: Lazy<StatementMetrics> = Lazy::new(StatementMetrics::init);

    pub struct StatementMetrics {
        pub statements_total: Counter<u64>,
        pub statement_errors_total: Counter<u64>,
        pub statement_duration: Histogram<f64>,
    }

    impl StatementMetrics {
        pub fn init() -> Self {
            let meter = global::meter("schemaquery");

            let statements_total = meter
                .u64_counter("schemaquery_statements_total")
                .with_description("Total statements executed")
                .build();

            let statement_errors_total = meter
                .u64_counter("schemaquery_statement_errors_total")
                .with_description("Statements that failed in the transport")
                .build();

            let statement_duration = meter
                .f64_histogram("schemaquery_statement_duration_seconds")
                .with_description("Duration of statements")
                .build();

            Self {
                statements_total,
                statement_errors_total,
                statement_duration,
            }
        }

        pub fn record_statement(&self, elapsed: Duration, ok: bool) {
            self.statements_total.add(1, &[]);
            if !ok {
                self.statement_errors_total.add(1, &[]);
            }
            self.statement_duration.record(elapsed.as_secs_f64(), &[]);
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    /// Span covering one statement round-trip
    pub fn statement_span(sql: &str) -> tracing::Span {
        tracing::info_span!("db.statement", db.system = "mysql", db.statement = %sql)
    }
}
