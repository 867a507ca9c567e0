//! Shared helpers for integration tests.

#![allow(dead_code)]

use sigshade::{
    annotation::{ArtifactCodec, SignatureAnnotation},
    signature::{LiteralKind, ENTRY_TYPE},
    utils::{encode_nat, write_nat},
    Error, Result, SignaturePickle,
};

/// Hand-assembles pickle bytes entry by entry.
#[derive(Default)]
pub struct PickleBuilder {
    entries: Vec<(u8, Vec<u8>)>,
}

impl PickleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&mut self, type_code: u8, payload: &[u8]) -> usize {
        self.entries.push((type_code, payload.to_vec()));
        self.entries.len() - 1
    }

    pub fn term_name(&mut self, text: &str) -> usize {
        self.raw(ENTRY_TYPE::TERM_NAME, text.as_bytes())
    }

    pub fn type_name(&mut self, text: &str) -> usize {
        self.raw(ENTRY_TYPE::TYPE_NAME, text.as_bytes())
    }

    pub fn link(&mut self, name_ref: usize, parent_ref: Option<usize>) -> usize {
        let mut payload = encode_nat(name_ref as u32);
        if let Some(parent_ref) = parent_ref {
            write_nat(parent_ref as u32, &mut payload);
        }
        self.raw(ENTRY_TYPE::EXT_MOD_CLASS_REF, &payload)
    }

    /// Name and link entries for every component of `path`; returns the leaf link.
    pub fn namespace(&mut self, path: &str) -> usize {
        let mut parent = None;
        for component in path.split('.') {
            let name = self.term_name(component);
            parent = Some(self.link(name, parent));
        }
        parent.expect("namespace has at least one component")
    }

    /// A string literal wrapped in a constant; returns `(name, literal)` indices.
    pub fn string_constant(&mut self, text: &str) -> (usize, usize) {
        let name = self.term_name(text);
        let literal = self.raw(LiteralKind::String.type_code(), &encode_nat(name as u32));
        self.raw(ENTRY_TYPE::CONSTANT_TYPE, &encode_nat(literal as u32));
        (name, literal)
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_version(5, 0)
    }

    pub fn build_with_version(&self, major: u32, minor: u32) -> Vec<u8> {
        let mut data = Vec::new();
        write_nat(major, &mut data);
        write_nat(minor, &mut data);
        write_nat(self.entries.len() as u32, &mut data);
        for (type_code, payload) in &self.entries {
            data.push(*type_code);
            write_nat(payload.len() as u32, &mut data);
            data.extend_from_slice(payload);
        }
        data
    }
}

/// Dotted paths of every resolvable namespace link.
pub fn namespaces(pickle: &SignaturePickle) -> Vec<String> {
    pickle
        .namespaces()
        .unwrap()
        .into_iter()
        .map(|(_, path)| path)
        .collect()
}

/// Resolved path of the link at `index`.
pub fn path_of(pickle: &SignaturePickle, index: usize) -> Option<String> {
    let table = pickle.table();
    table.resolve(table.link(index)?).unwrap()
}

const MAGIC: &[u8] = b"FAKECLS";

/// A stand-in class format: magic, annotation kind, then length-prefixed strings.
///
/// Kind `0` carries no signature, `1` a single value, `2` a chunked value.
pub struct FakeClassCodec;

impl FakeClassCodec {
    pub fn artifact(annotation: Option<&SignatureAnnotation>) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        match annotation {
            None => out.push(0),
            Some(SignatureAnnotation::Single(text)) => {
                out.push(1);
                push_string(&mut out, text);
            }
            Some(SignatureAnnotation::Chunked(chunks)) => {
                out.push(2);
                out.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
                for chunk in chunks {
                    push_string(&mut out, chunk);
                }
            }
        }
        out
    }
}

fn push_string(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(&(text.len() as u32).to_le_bytes());
    out.extend_from_slice(text.as_bytes());
}

fn read_u32(data: &[u8], pos: &mut usize) -> Result<usize> {
    let bytes = data
        .get(*pos..*pos + 4)
        .ok_or_else(|| Error::Error("truncated artifact".into()))?;
    *pos += 4;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
}

fn read_string(data: &[u8], pos: &mut usize) -> Result<String> {
    let len = read_u32(data, pos)?;
    let bytes = data
        .get(*pos..*pos + len)
        .ok_or_else(|| Error::Error("truncated artifact".into()))?;
    *pos += len;
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Error(e.to_string()))
}

impl ArtifactCodec for FakeClassCodec {
    fn extract(&self, artifact: &[u8]) -> Result<Option<SignatureAnnotation>> {
        let Some(rest) = artifact.strip_prefix(MAGIC) else {
            return Err(Error::Error("not a class artifact".into()));
        };
        let mut pos = 1;
        match rest.first() {
            Some(0) => Ok(None),
            Some(1) => Ok(Some(SignatureAnnotation::Single(read_string(rest, &mut pos)?))),
            Some(2) => {
                let count = read_u32(rest, &mut pos)?;
                let mut chunks = Vec::with_capacity(count);
                for _ in 0..count {
                    chunks.push(read_string(rest, &mut pos)?);
                }
                Ok(Some(SignatureAnnotation::Chunked(chunks)))
            }
            _ => Err(Error::Error("unknown annotation kind".into())),
        }
    }

    fn inject(&self, artifact: &[u8], annotation: &SignatureAnnotation) -> Result<Vec<u8>> {
        if !artifact.starts_with(MAGIC) {
            return Err(Error::Error("not a class artifact".into()));
        }
        Ok(Self::artifact(Some(annotation)))
    }
}
