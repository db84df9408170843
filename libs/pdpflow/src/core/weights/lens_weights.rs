// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Lens-style text weights files.
//!
//! ```text
//! <magic cookie>
//! <total links>
//! <values per link, 1-3>
//! <total updates>
//! for each group, for each unit, for each incoming link:
//!     <weight> [<last delta>] [<last value>]
//! ```

use crate::core::topology::{GroupId, Topology};
use crate::core::{PdpError, Result};
use std::collections::HashMap;
use std::path::Path;

pub const LENS_WEIGHT_MAGIC_COOKIE: u32 = 1431655766;

/// Header values of a weights file that matched the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightsFileInfo {
    pub links: u64,
    pub num_values: u32,
    pub updates: u32,
}

/// Read a weights file and store its weights in the topology's groups.
pub fn read_lens_weights(path: &Path, topology: &mut Topology) -> Result<WeightsFileInfo> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PdpError::WeightsFile(format!("cannot open weights file {}: {}", path.display(), e))
    })?;
    let info = load_lens_weights(&content, topology)?;
    tracing::info!(
        "Read {} weights from {} ({} updates)",
        info.links,
        path.display(),
        info.updates
    );
    Ok(info)
}

/// Parse weights text against `topology`. Group weights are replaced only
/// when the whole file parses and matches.
pub fn load_lens_weights(content: &str, topology: &mut Topology) -> Result<WeightsFileInfo> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate();

    let mut header = |name: &str| -> Result<u64> {
        let (n, line) = lines
            .next()
            .ok_or_else(|| PdpError::WeightsFile(format!("missing {} header", name)))?;
        line.parse::<u64>().map_err(|_| {
            PdpError::WeightsFile(format!("line {}: bad {} '{}'", n + 1, name, line))
        })
    };

    let magic = header("magic cookie")?;
    if magic != LENS_WEIGHT_MAGIC_COOKIE as u64 {
        return Err(PdpError::WeightsFile(format!(
            "incorrect weights file type (magic {})",
            magic
        )));
    }

    let links = header("link count")?;
    let expected = topology.expected_link_count();
    if links != expected {
        return Err(PdpError::WeightsFile(format!(
            "file holds {} links, network expects {}",
            links, expected
        )));
    }

    let num_values = header("value count")?;
    if !(1..=3).contains(&num_values) {
        return Err(PdpError::WeightsFile(format!(
            "values per link must be 1-3, got {}",
            num_values
        )));
    }
    let updates = header("update count")?;

    let mut next_weight = || -> Result<f64> {
        let (n, line) = lines
            .next()
            .ok_or_else(|| PdpError::WeightsFile("file ends before all weights".into()))?;
        let value = line
            .parse::<f64>()
            .map_err(|_| PdpError::WeightsFile(format!("line {}: bad weight '{}'", n + 1, line)))?;
        for _ in 1..num_values {
            lines.next().ok_or_else(|| {
                PdpError::WeightsFile("file ends before all weights".into())
            })?;
        }
        Ok(value)
    };

    let mut loaded: Vec<HashMap<GroupId, Vec<f64>>> = Vec::with_capacity(topology.groups().len());
    for group in topology.groups() {
        let sources: Vec<(GroupId, u32)> = topology
            .groups()
            .iter()
            .filter(|f| group.is_linked_from(f.id))
            .map(|f| (f.id, f.units))
            .collect();

        let mut blocks: HashMap<GroupId, Vec<f64>> = sources
            .iter()
            .map(|(id, units)| (*id, Vec::with_capacity((units * group.units) as usize)))
            .collect();

        for _ in 0..group.units {
            for (from, from_units) in &sources {
                let block = blocks.entry(*from).or_default();
                for _ in 0..*from_units {
                    block.push(next_weight()?);
                }
            }
        }
        loaded.push(blocks);
    }

    for (group, blocks) in topology.groups_mut().zip(loaded) {
        group.weights = blocks;
    }

    Ok(WeightsFileInfo {
        links,
        num_values: num_values as u32,
        updates: updates as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::GroupRole;

    fn network() -> (Topology, GroupId, GroupId) {
        let mut t = Topology::new(32).unwrap();
        let i = t
            .add_group(2, GroupRole::Input.into(), None, None, Some("in"))
            .unwrap();
        let o = t
            .add_group(2, GroupRole::Output.into(), None, None, Some("out"))
            .unwrap();
        t.add_link(i, o, None).unwrap();
        (t, i, o)
    }

    fn file(num_values: u32, weights: &[f64]) -> String {
        let mut out = format!("{}\n{}\n{}\n7\n", LENS_WEIGHT_MAGIC_COOKIE, weights.len(), num_values);
        for w in weights {
            out.push_str(&format!("{}\n", w));
            for _ in 1..num_values {
                out.push_str("0.0\n");
            }
        }
        out
    }

    #[test]
    fn test_reads_column_major_per_source() {
        let (mut t, i, o) = network();
        // out unit 0: bias, in0, in1; out unit 1: bias, in0, in1
        let text = file(2, &[0.5, 1.0, 2.0, -0.5, 3.0, 4.0]);

        let info = load_lens_weights(&text, &mut t).unwrap();
        assert_eq!(info.links, 6);
        assert_eq!(info.updates, 7);

        let out = t.group(o).unwrap();
        assert_eq!(out.weights[&t.bias()], vec![0.5, -0.5]);
        assert_eq!(out.weights[&i], vec![1.0, 2.0, 3.0, 4.0]);
        assert!(t.group(i).unwrap().weights.is_empty());
    }

    #[test]
    fn test_count_mismatch_leaves_groups_untouched() {
        let (mut t, _, o) = network();
        let text = file(1, &[1.0; 5]);
        let err = load_lens_weights(&text, &mut t);
        assert!(matches!(err, Err(PdpError::WeightsFile(_))));
        assert!(t.group(o).unwrap().weights.is_empty());
    }

    #[test]
    fn test_wrong_magic() {
        let (mut t, _, _) = network();
        let text = file(1, &[1.0; 6]).replacen("1431655766", "42", 1);
        assert!(load_lens_weights(&text, &mut t).is_err());
    }

    #[test]
    fn test_truncated_file() {
        let (mut t, _, _) = network();
        let mut text = file(1, &[1.0; 6]);
        text.truncate(text.len() - 4);
        assert!(load_lens_weights(&text, &mut t).is_err());
    }

    #[test]
    fn test_read_from_disk() {
        let (mut t, _, _) = network();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.wts");
        std::fs::write(&path, file(3, &[0.25; 6])).unwrap();
        assert_eq!(read_lens_weights(&path, &mut t).unwrap().num_values, 3);

        let missing = dir.path().join("none.wts");
        assert!(matches!(
            read_lens_weights(&missing, &mut t),
            Err(PdpError::WeightsFile(_))
        ));
    }
}
