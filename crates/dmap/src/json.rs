//! JSON rendering of decoded tag trees, for inspection and tooling.

use serde_json::{Map, Value as JsonValue};

use crate::{Children, ContentCode, ContentCodes, DmapError, Tag};

/// Deepest container nesting [`tag_to_json`] will render.
///
/// Real responses nest a handful of levels; anything past this is treated
/// as hostile input.
pub const MAX_DUMP_DEPTH: usize = 64;

/// A container being rendered: its code, where it starts, the children
/// still to visit and the rendered ones.
struct Frame<'a> {
    code: ContentCode,
    offset: usize,
    children: Children<'a>,
    rendered: Vec<JsonValue>,
}

enum Rendered<'a> {
    Leaf(JsonValue),
    Open(Frame<'a>),
}

/// Renders `tag` as a single-key object `{ "code": value }`.
///
/// Containers become arrays of their children (names repeat, so an
/// object would lose siblings). Codes missing from the table render their
/// payload as lowercase hex. The tree is walked with an explicit stack;
/// containers nested deeper than [`MAX_DUMP_DEPTH`] fail with
/// [`DmapError::TooDeep`].
pub fn tag_to_json(tag: &Tag<'_>) -> Result<JsonValue, DmapError> {
    let mut stack = match render(tag)? {
        Rendered::Leaf(value) => return Ok(value),
        Rendered::Open(frame) => vec![frame],
    };
    while let Some(top) = stack.last_mut() {
        match top.children.next() {
            Some(child) => match render(&child)? {
                Rendered::Leaf(value) => top.rendered.push(value),
                Rendered::Open(frame) => {
                    if stack.len() >= MAX_DUMP_DEPTH {
                        return Err(DmapError::TooDeep {
                            code: frame.code.to_string(),
                            offset: frame.offset,
                            limit: MAX_DUMP_DEPTH,
                        });
                    }
                    stack.push(frame);
                }
            },
            None => {
                let Some(done) = stack.pop() else { break };
                let value = entry(done.code, JsonValue::Array(done.rendered));
                match stack.last_mut() {
                    Some(parent) => parent.rendered.push(value),
                    None => return Ok(value),
                }
            }
        }
    }
    Ok(JsonValue::Null)
}

/// Renders a scalar completely, or opens a container for the walk.
fn render<'a>(tag: &Tag<'a>) -> Result<Rendered<'a>, DmapError> {
    let (Some(code), Some(offset)) = (tag.name(), tag.offset()) else {
        return Ok(Rendered::Leaf(JsonValue::Null));
    };
    let value = match tag.codes().kind_of(&code) {
        Some(kind) if kind.is_container() => {
            return Ok(Rendered::Open(Frame {
                code,
                offset,
                children: tag.children(),
                rendered: Vec::new(),
            }))
        }
        Some(_) => tag.value()?.map_or(JsonValue::Null, |v| v.to_json()),
        None => JsonValue::from(hex(tag.payload().unwrap_or_default())),
    };
    Ok(Rendered::Leaf(entry(code, value)))
}

fn entry(code: ContentCode, value: JsonValue) -> JsonValue {
    let mut object = Map::new();
    object.insert(code.to_string(), value);
    JsonValue::Object(object)
}

/// Renders every top-level tag in `data`.
pub fn dump(data: &[u8], codes: &ContentCodes) -> Result<JsonValue, DmapError> {
    let mut out = Vec::new();
    let mut tag = Tag::decode(data, 0, codes)?;
    while tag.is_valid() {
        out.push(tag_to_json(&tag)?);
        tag = tag.next_sibling();
    }
    Ok(JsonValue::Array(out))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
