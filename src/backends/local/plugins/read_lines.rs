// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_stream::stream;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

use crate::errors::{PluginConfigurationError, StreamProcessingError};
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, Item, ItemStream, Plugin};

/// Source emitting each line of the file at `path` as a string item.
///
/// The file is opened when the stream is first polled, not at configure time.
pub struct ReadLines;

impl Plugin for ReadLines {
    fn name(&self) -> &'static str {
        "read_lines"
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredReadLines {
            path: PathBuf::from(config.require("path")?),
            skip_empty: config.get_bool("skip_empty", false)?,
        }))
    }
}

struct ConfiguredReadLines {
    path: PathBuf,
    skip_empty: bool,
}

fn read_error(path: &Path, error: std::io::Error) -> StreamProcessingError {
    StreamProcessingError::new(format!("read_lines failed on '{}': {}", path.display(), error))
}

impl ConfiguredPlugin for ConfiguredReadLines {
    fn bind(self: Box<Self>, _inputs: Vec<ItemStream>) -> ItemStream {
        let ConfiguredReadLines { path, skip_empty } = *self;
        stream! {
            match File::open(&path).await {
                Err(e) => {
                    yield Err(read_error(&path, e));
                }
                Ok(file) => {
                    let mut lines = LinesStream::new(BufReader::new(file).lines());
                    while let Some(line) = lines.next().await {
                        match line {
                            Ok(line) if skip_empty && line.trim().is_empty() => {}
                            Ok(line) => {
                                yield Ok(Item::String(line));
                            }
                            Err(e) => {
                                yield Err(read_error(&path, e));
                                break;
                            }
                        }
                    }
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::plugins::test_support::run;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "alpha\n\nbeta\ngamma").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cases = vec![
            ("false", vec![json!("alpha"), json!(""), json!("beta"), json!("gamma")]),
            ("true", vec![json!("alpha"), json!("beta"), json!("gamma")]),
        ];

        for (skip_empty, expected) in cases {
            let output = run(
                &ReadLines,
                &[("path", path.as_str()), ("skip_empty", skip_empty)],
                vec![],
            )
            .await;
            let items: Vec<Item> = output.into_iter().map(Result::unwrap).collect();
            assert_eq!(items, expected, "skip_empty={}", skip_empty);
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails_branch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let output = run(&ReadLines, &[("path", path.to_str().unwrap())], vec![]).await;

        assert_eq!(output.len(), 1);
        assert!(output[0].clone().unwrap_err().message.contains("absent.txt"));
    }

    #[test]
    fn test_path_is_required() {
        assert!(matches!(
            ReadLines.configure(&NodeConfig::new()),
            Err(PluginConfigurationError::MissingOption { .. })
        ));
    }
}
