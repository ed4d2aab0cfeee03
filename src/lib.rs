/*!
 * # textstim - Text stimulus timelines and feature extraction
 *
 * A Rust library for turning text stimuli (words, sentences, documents) into
 * timelines of extracted features.
 *
 * ## Features
 *
 * - Load timed text collections from tab-delimited files (with or without a
 *   header row) and from SRT subtitle files
 * - Segment raw text into word or sentence elements using a regex pattern,
 *   a custom tokenizer, a pluggable NLP tokenizer or the built-in fallback
 * - Apply element-level and collection-level extractors
 * - Merge extractor output into a single onset-ordered timeline
 * - Tabular view of the timeline, serializable with serde
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `stimuli`: Text elements, collections and tokenizers:
 *   - `stimuli::element`: Single text elements with optional timing
 *   - `stimuli::collection`: Ordered collections and file ingestion
 *   - `stimuli::tokenizer`: Segmentation strategies
 * - `timeline`: Events, timelines and the merge algorithm
 * - `extraction`: Extractor trait and the extraction coordinator
 * - `extractors`: Built-in reference extractors
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: Tokenizer language resolution
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod extractors;
pub mod file_utils;
pub mod language_utils;
pub mod stimuli;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ExtractionError, ResourceError, StimulusError};
pub use extraction::{ExtractionCoordinator, Extractor, ExtractorOutput, ExtractorTarget, StimulusUnit};
pub use stimuli::{TextCollection, TextElement, Tokenizer};
pub use timeline::{Event, Timeline, TimelineTable};
