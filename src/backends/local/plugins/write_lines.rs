// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_stream::stream;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::merged;
use crate::errors::{PluginConfigurationError, StreamProcessingError};
use crate::graph::NodeConfig;
use crate::traits::{Arity, ConfiguredPlugin, ItemStream, Plugin};

/// Writes every item as one JSON line to `path` and forwards it.
///
/// The file is created (or truncated, unless `append` is true) when the first
/// item arrives.
pub struct WriteLines;

impl Plugin for WriteLines {
    fn name(&self) -> &'static str {
        "write_lines"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn configure(
        &self,
        config: &NodeConfig,
    ) -> Result<Box<dyn ConfiguredPlugin>, PluginConfigurationError> {
        Ok(Box::new(ConfiguredWriteLines {
            path: PathBuf::from(config.require("path")?),
            append: config.get_bool("append", false)?,
        }))
    }
}

struct ConfiguredWriteLines {
    path: PathBuf,
    append: bool,
}

fn write_error(path: &Path, error: std::io::Error) -> StreamProcessingError {
    StreamProcessingError::new(format!("write_lines failed on '{}': {}", path.display(), error))
}

async fn open(path: &Path, append: bool) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .await
}

impl ConfiguredPlugin for ConfiguredWriteLines {
    fn bind(self: Box<Self>, inputs: Vec<ItemStream>) -> ItemStream {
        let ConfiguredWriteLines { path, append } = *self;
        let mut input = merged(inputs);

        stream! {
            let mut file: Option<File> = None;
            while let Some(element) = input.next().await {
                let item = match element {
                    Ok(item) => item,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };

                if file.is_none() {
                    match open(&path, append).await {
                        Ok(opened) => file = Some(opened),
                        Err(e) => {
                            yield Err(write_error(&path, e));
                            break;
                        }
                    }
                }

                if let Some(writer) = file.as_mut() {
                    let line = format!("{}\n", item);
                    if let Err(e) = writer.write_all(line.as_bytes()).await {
                        yield Err(write_error(&path, e));
                        break;
                    }
                }
                yield Ok(item);
            }

            if let Some(mut writer) = file {
                if let Err(e) = writer.flush().await {
                    yield Err(write_error(&path, e));
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
    use crate::traits::Item;
    use serde_json::json;

    #[tokio::test]
    async fn test_writes_json_lines_and_forwards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jsonl");
        let path_str = path.to_str().unwrap();

        let output = run(
            &WriteLines,
            &[("path", path_str)],
            vec![vec![json!("a"), json!({"n": 1})]],
        )
        .await;

        let items: Vec<Item> = output.into_iter().map(Result::unwrap).collect();
        assert_eq!(items, vec![json!("a"), json!({"n": 1})]);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\"a\"\n{\"n\":1}\n"
        );
    }

    #[tokio::test]
    async fn test_append_option() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let path_str = path.to_str().unwrap();
        let cases = vec![("true", "0\n1\n"), ("false", "1\n")];

        for (append, expected) in cases {
            std::fs::write(&path, "0\n").unwrap();
            run(
                &WriteLines,
                &[("path", path_str), ("append", append)],
                vec![vec![json!(1)]],
            )
            .await;
            assert_eq!(std::fs::read_to_string(&path).unwrap(), expected, "append={}", append);
        }
    }

    #[tokio::test]
    async fn test_upstream_error_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.jsonl");
        let config: NodeConfig = [("path", path.to_str().unwrap())].into_iter().collect();
        let plugin = WriteLines.configure(&config).unwrap();

        let input: ItemStream = futures::stream::iter(vec![Err(StreamProcessingError::new("boom"))]).boxed();
        let output: Vec<_> = plugin.bind(vec![input]).collect().await;

        assert_eq!(output, vec![Err(StreamProcessingError::new("boom"))]);
        assert!(!path.exists());
    }
}
