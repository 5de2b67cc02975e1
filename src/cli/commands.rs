// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `convert` and `validate`, and
// all their flags. Each argument struct converts into the
// matching application config, so Layer 2 never sees clap types.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::convert_use_case::ConvertConfig;
use crate::application::validate_use_case::ValidateConfig;
use crate::data::annotation_table::TableFormat;
use crate::data::validator::SampleLimits;
use crate::domain::layout::FileLayout;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an annotation table and image folder into image/caption pairs
    Convert(ConvertArgs),

    /// Check that every image has a caption file and vice versa
    Validate(ValidateArgs),
}

/// All arguments for the `convert` command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Dataset directory holding the annotation file and image folder
    #[arg(long)]
    pub input_dir: String,

    /// Directory to write paired image/caption files into
    #[arg(long)]
    pub output_dir: String,

    /// Keep captions in annotation order instead of shuffling them
    #[arg(long)]
    pub no_shuffle: bool,

    /// Seed for caption shuffling (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Annotation file name, relative to the input directory
    #[arg(long, default_value = "results.csv")]
    pub annotations_file: String,

    /// Image folder name, relative to the input directory
    #[arg(long, default_value = "flickr30k_images")]
    pub images_subdir: String,

    /// Header name of the image column (surrounding spaces ignored)
    #[arg(long, default_value = "image_name")]
    pub image_column: String,

    /// Header name of the caption column (surrounding spaces ignored)
    #[arg(long, default_value = "comment")]
    pub caption_column: String,

    /// Field delimiter of the annotation file (single ASCII character)
    #[arg(long, default_value_t = '|', value_parser = parse_delimiter)]
    pub delimiter: char,

    /// Image file extension; repeat for several
    #[arg(long = "image-ext", default_value = "jpg")]
    pub image_extensions: Vec<String>,

    /// Caption file extension
    #[arg(long = "caption-ext", default_value = "txt")]
    pub caption_extension: String,

    /// Log progress every N images (0 = only at the end)
    #[arg(long, default_value_t = 1000)]
    pub progress_every: usize,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub summary: Option<String>,
}

impl From<ConvertArgs> for ConvertConfig {
    fn from(a: ConvertArgs) -> Self {
        ConvertConfig {
            input_dir:        a.input_dir,
            output_dir:       a.output_dir,
            annotations_file: a.annotations_file,
            images_subdir:    a.images_subdir,
            table:            TableFormat {
                // parse_delimiter only accepts ASCII
                delimiter:      a.delimiter as u8,
                image_column:   a.image_column,
                caption_column: a.caption_column,
            },
            layout:           FileLayout::new(a.image_extensions, a.caption_extension),
            shuffle:          !a.no_shuffle,
            seed:             a.seed,
            progress_every:   a.progress_every,
            summary_path:     a.summary,
        }
    }
}

/// All arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory to validate; each direct sub-directory is checked separately if any exist
    #[arg(long)]
    pub dataset_dir: String,

    /// Seed for picking diagnostic samples (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Image file extension; repeat for several
    #[arg(long = "image-ext", default_value = "jpg")]
    pub image_extensions: Vec<String>,

    /// Caption file extension
    #[arg(long = "caption-ext", default_value = "txt")]
    pub caption_extension: String,

    /// Print the full outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Write the full outcome as JSON to this file
    #[arg(long)]
    pub report: Option<String>,
}

impl From<ValidateArgs> for ValidateConfig {
    fn from(a: ValidateArgs) -> Self {
        ValidateConfig {
            dataset_dir: a.dataset_dir,
            layout:      FileLayout::new(a.image_extensions, a.caption_extension),
            seed:        a.seed,
            limits:      SampleLimits::default(),
            report_path: a.report,
        }
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}
