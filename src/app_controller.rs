use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::extraction::{ExtractionCoordinator, Extractor};
use crate::extractors;
use crate::file_utils::FileManager;
use crate::stimuli::{
    CachingResolver, OfflineResolver, RuleBasedResolver, TextCollection, Tokenizer, TokenizerResolver,
};
use crate::timeline::{Timeline, TimelineTable};

// @module: Application controller for stimulus extraction

/// Main application controller: loads stimuli, runs the configured
/// extractors and writes the resulting timeline tables
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Source of NLP tokenizers for segmentation
    resolver: Box<dyn TokenizerResolver>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let resolver: Box<dyn TokenizerResolver> = if config.segmentation.use_rule_tokenizer {
            Box::new(CachingResolver::new(RuleBasedResolver))
        } else {
            Box::new(OfflineResolver)
        };

        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Instantiate the configured extractors, in run order
    pub fn extractors(&self) -> Result<Vec<Box<dyn Extractor>>> {
        self.config
            .extraction
            .extractors
            .iter()
            .map(|name| extractors::builtin(name).ok_or_else(|| anyhow!("Unknown extractor: {}", name)))
            .collect()
    }

    /// Load a stimulus file according to the ingestion settings
    pub fn load_collection<P: AsRef<Path>>(&self, path: P) -> Result<TextCollection> {
        let path = path.as_ref();
        let collection = TextCollection::open(path, &self.config.ingestion)
            .with_context(|| format!("Failed to load stimuli from {}", path.display()))?;
        debug!("Loaded {} elements from {:?}", collection.len(), path);
        Ok(collection)
    }

    /// Segment raw text according to the segmentation settings
    pub fn segment_text(&self, text: &str) -> Result<TextCollection> {
        let segmentation = &self.config.segmentation;
        let tokenizer = segmentation
            .pattern
            .as_deref()
            .map(Tokenizer::pattern)
            .transpose()?;

        let collection = TextCollection::from_text_with_resolver(
            text,
            &segmentation.unit,
            tokenizer.as_ref(),
            &segmentation.language,
            self.resolver.as_ref(),
        )?;
        Ok(collection)
    }

    /// Run the configured extractors over a collection
    pub fn run_extraction(&self, collection: &TextCollection) -> Result<Timeline> {
        let owned = self.extractors()?;
        let borrowed: Vec<&dyn Extractor> = owned.iter().map(|e| e.as_ref()).collect();
        let coordinator = ExtractionCoordinator::new(&borrowed, self.config.extraction.merge_events);
        Ok(coordinator.extract(collection)?)
    }

    /// Load a file and extract its timeline table
    pub fn process_file<P: AsRef<Path>>(&self, input_file: P) -> Result<TimelineTable> {
        let collection = self.load_collection(&input_file)?;
        let timeline = self.run_extraction(&collection)?;
        info!(
            "Extracted {} events from {} elements in {:?}",
            timeline.len(),
            collection.len(),
            input_file.as_ref()
        );
        Ok(timeline.to_table())
    }

    /// Process one file, writing JSON to `output_file` or stdout
    pub fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if let Some(output_file) = &output_file {
            if output_file.exists() && !force_overwrite {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_file);
                return Ok(());
            }
        }

        let table = self.process_file(&input_file)?;
        let json = serde_json::to_string_pretty(&table).context("Failed to serialize timeline table")?;

        match output_file {
            Some(output_file) => {
                FileManager::write_to_file(&output_file, &json)?;
                info!("Success: {:?}", output_file);
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    /// Process every stimulus file under a directory. Each table is written
    /// next to its input (or into `output_dir`); failures are logged and
    /// skipped. Returns the number of files written.
    pub fn run_folder(&self, input_dir: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<usize> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        info!("Starting extraction for directory: {:?}", input_dir);
        let mut processed_count = 0;

        for input_file in FileManager::find_stimulus_files(&input_dir)? {
            let target_dir = match &output_dir {
                Some(dir) => dir.clone(),
                None => input_file.parent().unwrap_or(Path::new(".")).to_path_buf(),
            };
            let output_file = FileManager::generate_output_path(&input_file, &target_dir, "json");

            if output_file.exists() && !force_overwrite {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_file);
                continue;
            }

            match self.run(input_file.clone(), Some(output_file), force_overwrite) {
                Ok(()) => processed_count += 1,
                Err(e) => error!("Error processing {:?}: {:#}", input_file, e),
            }
        }

        info!("Finished processing {} files", processed_count);
        Ok(processed_count)
    }
}
