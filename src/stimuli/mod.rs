/*!
 * Text stimuli: single elements, ordered collections and the tokenizers used
 * to build collections from raw text.
 */

pub mod collection;
pub mod element;
pub mod tokenizer;

// Re-export types used externally
pub use collection::{TextCollection, validate_column_spec};
pub use element::TextElement;
pub use tokenizer::{
    CachingResolver, NlpTokenizer, OfflineResolver, RuleBasedResolver, RuleBasedTokenizer,
    SegmentUnit, Tokenize, Tokenizer, TokenizerResolver, fallback_word_tokenize,
};
