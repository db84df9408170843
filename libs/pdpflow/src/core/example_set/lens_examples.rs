// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Reader for Lens-format example files.
//!
//! ```text
//! # set header, up to the first ';'
//! max: 3 min: 1 defT: 0 ;
//! name: one 2
//! [0] I: 1 0 T: 0 1
//! [1 max: 2] i: (in 0) t: 1 ;
//! ```

use super::example_set::{Event, Example, ValueList};
use crate::core::{PdpError, Result};

/// Set-level values declared in the file header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensHeader {
    pub max_time: Option<f64>,
    pub min_time: Option<f64>,
    pub grace_time: Option<f64>,
    pub def_input: Option<f64>,
    pub def_target: Option<f64>,
    pub active_input: Option<f64>,
    pub active_target: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct LensExamples {
    pub header: LensHeader,
    pub examples: Vec<Example>,
}

/// Largest event count or event index an example may declare.
pub const MAX_EVENTS_PER_EXAMPLE: usize = 1 << 16;

const HEADER_KEYS: [&str; 8] = [
    "proc:", "max:", "min:", "grace:", "defI:", "actI:", "defT:", "actT:",
];

/// Parse the text of a Lens example file.
pub fn parse_lens_examples(content: &str) -> Result<LensExamples> {
    let tokens = tokenize(content);
    let segments: Vec<&[String]> = tokens
        .split(|t| t == ";")
        .filter(|s| !s.is_empty())
        .collect();

    let mut parsed = LensExamples::default();
    let mut rest = segments.as_slice();

    if let Some((first, tail)) = rest.split_first() {
        if is_header(first) {
            parsed.header = parse_header(first)?;
            rest = tail;
        }
    }

    let active_input = parsed.header.active_input.unwrap_or(1.0);
    let active_target = parsed.header.active_target.unwrap_or(1.0);

    for segment in rest {
        let mut cursor = Cursor::new(segment);
        parsed
            .examples
            .push(parse_example(&mut cursor, active_input, active_target)?);
    }
    Ok(parsed)
}

fn tokenize(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("");
        let mut current = String::new();
        for ch in line.chars() {
            match ch {
                ';' | '(' | ')' | '[' | ']' => {
                    flush(&mut current, &mut tokens);
                    tokens.push(ch.to_string());
                }
                ':' => {
                    current.push(ch);
                    flush(&mut current, &mut tokens);
                }
                c if c.is_whitespace() => flush(&mut current, &mut tokens),
                c => current.push(c),
            }
        }
        flush(&mut current, &mut tokens);
    }
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

fn is_key(token: &str) -> bool {
    token.ends_with(':')
}

fn is_header(segment: &[String]) -> bool {
    segment
        .iter()
        .filter(|t| is_key(t))
        .all(|t| HEADER_KEYS.contains(&t.as_str()))
        && segment.iter().any(|t| is_key(t))
        && !segment.iter().any(|t| t == "[")
}

fn parse_header(segment: &[String]) -> Result<LensHeader> {
    let mut header = LensHeader::default();
    let mut cursor = Cursor::new(segment);
    while let Some(key) = cursor.next() {
        let value = cursor.value_for(key)?;
        match key {
            "proc:" => {}
            "max:" => header.max_time = parse_real(value)?,
            "min:" => header.min_time = parse_real(value)?,
            "grace:" => header.grace_time = parse_real(value)?,
            "defI:" => header.def_input = parse_real(value)?,
            "actI:" => header.active_input = parse_real(value)?,
            "defT:" => header.def_target = parse_real(value)?,
            "actT:" => header.active_target = parse_real(value)?,
            other => {
                return Err(PdpError::Example(format!("unexpected header token '{}'", other)));
            }
        }
    }
    Ok(header)
}

/// Value lists waiting to be attached to one or more events.
#[derive(Default)]
struct PendingLists {
    inputs: Vec<ValueList>,
    targets: Vec<ValueList>,
}

fn parse_example(cursor: &mut Cursor<'_>, act_i: f64, act_t: f64) -> Result<Example> {
    let mut example = Example::default();
    let mut declared_events: Option<usize> = None;

    // example-level keys
    while let Some(token) = cursor.peek() {
        match token {
            "name:" => {
                cursor.next();
                example.name = Some(cursor.value_for("name:")?.to_string());
            }
            "proc:" => {
                cursor.next();
                cursor.value_for("proc:")?;
            }
            "freq:" => {
                cursor.next();
                example.freq = parse_real(cursor.value_for("freq:")?)?;
            }
            t if !is_key(t) && t != "[" => {
                let count = t.parse::<usize>().map_err(|_| {
                    PdpError::Example(format!("expected an event count, found '{}'", t))
                })?;
                declared_events = Some(check_event_bound(count, t)?);
                cursor.next();
            }
            _ => break,
        }
    }

    if cursor.peek() != Some("[") {
        // lists outside brackets apply to every event
        let lists = parse_lists(cursor, act_i, act_t)?;
        if let Some(token) = cursor.peek() {
            return Err(PdpError::Example(format!("unexpected token '{}'", token)));
        }
        let count = declared_events.unwrap_or(1);
        example.events = (0..count).map(|_| lists.to_event(Event::new())).collect();
        return Ok(example);
    }

    let mut blocks: Vec<(Vec<usize>, Event, PendingLists)> = Vec::new();
    while cursor.peek() == Some("[") {
        cursor.next();
        let (indices, event) = parse_event_header(cursor, declared_events)?;
        let lists = parse_lists(cursor, act_i, act_t)?;
        blocks.push((indices, event, lists));
    }
    if let Some(token) = cursor.peek() {
        return Err(PdpError::Example(format!("unexpected token '{}'", token)));
    }

    let highest = blocks
        .iter()
        .flat_map(|(indices, _, _)| indices.iter().copied())
        .max()
        .map_or(0, |m| m + 1);
    let count = declared_events.unwrap_or(highest).max(highest);

    example.events = vec![Event::new(); count];
    for (indices, template, lists) in blocks {
        for index in indices {
            let merged = merge_event(&example.events[index], &template);
            example.events[index] = lists.to_event(merged);
        }
    }
    Ok(example)
}

/// Reads `n`, `n-m` or `*` plus optional event keys up to the closing `]`.
fn parse_event_header(
    cursor: &mut Cursor<'_>,
    declared: Option<usize>,
) -> Result<(Vec<usize>, Event)> {
    let mut indices = Vec::new();
    let mut event = Event::new();

    while let Some(token) = cursor.next() {
        match token {
            "]" => {
                if indices.is_empty() {
                    indices.push(0);
                }
                return Ok((indices, event));
            }
            "max:" => event.max_time = parse_real(cursor.value_for(token)?)?,
            "min:" => event.min_time = parse_real(cursor.value_for(token)?)?,
            "grace:" => event.grace_time = parse_real(cursor.value_for(token)?)?,
            "defI:" => event.def_input = parse_real(cursor.value_for(token)?)?,
            "defT:" => event.def_target = parse_real(cursor.value_for(token)?)?,
            "proc:" => {
                cursor.value_for(token)?;
            }
            "*" => {
                let count = declared.ok_or_else(|| {
                    PdpError::Example("'[*]' needs a declared event count".into())
                })?;
                indices.extend(0..count);
            }
            range => indices.extend(parse_range(range)?),
        }
    }
    Err(PdpError::Example("unterminated '[' event block".into()))
}

fn parse_range(token: &str) -> Result<Vec<usize>> {
    let bad = || PdpError::Example(format!("bad event index '{}'", token));
    match token.split_once('-') {
        Some((a, b)) => {
            let a: usize = a.parse().map_err(|_| bad())?;
            let b: usize = b.parse().map_err(|_| bad())?;
            if b < a {
                return Err(bad());
            }
            check_event_bound(b.saturating_add(1), token)?;
            Ok((a..=b).collect())
        }
        None => {
            let index: usize = token.parse().map_err(|_| bad())?;
            check_event_bound(index.saturating_add(1), token)?;
            Ok(vec![index])
        }
    }
}

/// Rejects event counts that would size an example past
/// [`MAX_EVENTS_PER_EXAMPLE`] before anything is allocated.
fn check_event_bound(count: usize, token: &str) -> Result<usize> {
    if count > MAX_EVENTS_PER_EXAMPLE {
        return Err(PdpError::Example(format!(
            "'{}' needs {} events, at most {} allowed per example",
            token, count, MAX_EVENTS_PER_EXAMPLE
        )));
    }
    Ok(count)
}

fn merge_event(base: &Event, template: &Event) -> Event {
    Event {
        max_time: template.max_time.or(base.max_time),
        min_time: template.min_time.or(base.min_time),
        grace_time: template.grace_time.or(base.grace_time),
        def_input: template.def_input.or(base.def_input),
        def_target: template.def_target.or(base.def_target),
        inputs: base.inputs.clone(),
        targets: base.targets.clone(),
    }
}

impl PendingLists {
    fn to_event(&self, mut event: Event) -> Event {
        event.inputs.extend(self.inputs.iter().cloned());
        event.targets.extend(self.targets.iter().cloned());
        event
    }
}

fn parse_lists(cursor: &mut Cursor<'_>, act_i: f64, act_t: f64) -> Result<PendingLists> {
    let mut pending = PendingLists::default();
    while let Some(key) = cursor.peek() {
        let (input, target, sparse) = match key {
            "I:" => (true, false, false),
            "i:" => (true, false, true),
            "T:" => (false, true, false),
            "t:" => (false, true, true),
            "B:" => (true, true, false),
            "b:" => (true, true, true),
            _ => break,
        };
        cursor.next();

        for (label, raw) in read_value_groups(cursor)? {
            if input {
                pending.inputs.push(make_list(label.as_deref(), &raw, sparse, act_i)?);
            }
            if target {
                pending.targets.push(make_list(label.as_deref(), &raw, sparse, act_t)?);
            }
        }
    }
    Ok(pending)
}

/// Collects `(label v ...)` groups and plain values following a list key.
fn read_value_groups(cursor: &mut Cursor<'_>) -> Result<Vec<(Option<String>, Vec<String>)>> {
    let mut groups = Vec::new();
    let mut plain = Vec::new();

    while let Some(token) = cursor.peek() {
        if is_key(token) || token == "[" || token == "]" {
            break;
        }
        cursor.next();
        if token == "(" {
            let label = cursor
                .next()
                .filter(|t| *t != ")")
                .ok_or_else(|| PdpError::Example("'(' without a group name".into()))?
                .to_string();
            let mut values = Vec::new();
            loop {
                match cursor.next() {
                    Some(")") => break,
                    Some(v) => values.push(v.to_string()),
                    None => {
                        return Err(PdpError::Example(format!(
                            "unterminated value list for group '{}'",
                            label
                        )));
                    }
                }
            }
            groups.push((Some(label), values));
        } else {
            plain.push(token.to_string());
        }
    }

    if !plain.is_empty() {
        groups.insert(0, (None, plain));
    }
    Ok(groups)
}

fn make_list(label: Option<&str>, raw: &[String], sparse: bool, active: f64) -> Result<ValueList> {
    if sparse {
        let active_units = raw
            .iter()
            .map(|t| {
                t.parse::<u32>().map_err(|_| {
                    PdpError::Example(format!("bad unit index '{}' in sparse list", t))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ValueList::sparse(label, active_units, active))
    } else {
        let values = raw
            .iter()
            .map(|t| parse_real(t))
            .collect::<Result<Vec<_>>>()?;
        Ok(ValueList::dense(label, values))
    }
}

/// `-` and `nan` read as absent.
fn parse_real(token: &str) -> Result<Option<f64>> {
    if token == "-" || token.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PdpError::Example(format!("bad number '{}'", token)))
}

struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn value_for(&mut self, key: &str) -> Result<&'a str> {
        self.next()
            .filter(|t| !is_key(t))
            .ok_or_else(|| PdpError::Example(format!("'{}' needs a value", key)))
    }
}
