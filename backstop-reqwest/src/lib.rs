#![warn(missing_docs)]
//! # backstop-reqwest
//!
//! [`reqwest`] transport adapter for the Backstop pipeline.
//!
//! [`ReqwestUpstream`] implements the pipeline's `Upstream` seam over a
//! `reqwest::Client`, buffering response bodies and classifying
//! `reqwest::Error` values into the pipeline's transport-error taxonomy so
//! the retry classifier can reason about them.
//!
//! ```no_run
//! use std::sync::Arc;
//! use backstop::{Chain, Client, PipelineConfig, RequestDescriptor};
//! use backstop_reqwest::ReqwestUpstream;
//!
//! # async fn run() -> Result<(), reqwest::Error> {
//! let upstream = ReqwestUpstream::with_default_timeouts()?;
//! let chain = Chain::builder()
//!     .config(PipelineConfig::default())
//!     .build(Arc::new(upstream));
//! let client = Client::new(chain);
//!
//! let outcome = client
//!     .call(RequestDescriptor::get("http://api.example.com/users".parse().unwrap()))
//!     .await;
//! # Ok(())
//! # }
//! ```

mod upstream;

pub use upstream::ReqwestUpstream;
