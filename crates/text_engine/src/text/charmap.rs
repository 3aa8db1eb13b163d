//! Code point to glyph index caching
//!
//! [`CodepointIndexCache`] answers "which glyph of the face draws this code
//! point". The first 128 code points are looked up eagerly when the cache is
//! attached to a face; anything above goes through a [`SparseIndexMap`] that
//! is filled on demand.

use super::error::{FontError, FontResult};
use super::face::{Encoding, FontFace, GlyphIndex};

/// Entries per bucket at every level of the sparse map (7 bits of key)
pub const BUCKET_SIZE: usize = 128;

/// First value that is not a Unicode code point
pub const UNICODE_LIMIT: u32 = 0x11_0000;

/// Leaf value for a key that was never inserted
pub const INDEX_NOT_FOUND: GlyphIndex = -1;

/// Code points resolved eagerly at attach time
pub const MAX_PRECOMPUTED: usize = 128;

const OUTER_BUCKETS: usize = (UNICODE_LIMIT as usize).div_ceil(BUCKET_SIZE * BUCKET_SIZE);

type Leaf = [GlyphIndex; BUCKET_SIZE];

struct InnerBucket {
    leaves: [Option<Box<Leaf>>; BUCKET_SIZE],
}

impl InnerBucket {
    fn new() -> Box<Self> {
        Box::new(Self {
            leaves: std::array::from_fn(|_| None),
        })
    }
}

/// Map from code point to a non-negative index
///
/// Three levels of 128-entry buckets keyed by successive 7-bit slices of the
/// code point. Buckets are allocated on first insert and dropped together by
/// [`SparseIndexMap::clear`].
#[derive(Default)]
pub struct SparseIndexMap {
    outer: Vec<Option<Box<InnerBucket>>>,
    len: usize,
}

impl SparseIndexMap {
    /// Create an empty map; no bucket is allocated until the first insert
    pub fn new() -> Self {
        Self::default()
    }

    fn split(codepoint: u32) -> (usize, usize, usize) {
        let cp = codepoint as usize;
        (cp / (BUCKET_SIZE * BUCKET_SIZE), (cp / BUCKET_SIZE) % BUCKET_SIZE, cp % BUCKET_SIZE)
    }

    fn get(&self, codepoint: u32) -> GlyphIndex {
        if codepoint >= UNICODE_LIMIT {
            return INDEX_NOT_FOUND;
        }
        let (outer, inner, leaf) = Self::split(codepoint);
        self.outer
            .get(outer)
            .and_then(Option::as_ref)
            .and_then(|bucket| bucket.leaves[inner].as_ref())
            .map_or(INDEX_NOT_FOUND, |values| values[leaf])
    }

    /// Index stored for `codepoint`, or 0 when there is none
    pub fn find(&self, codepoint: u32) -> GlyphIndex {
        match self.get(codepoint) {
            INDEX_NOT_FOUND => 0,
            index => index,
        }
    }

    /// Whether an index was inserted for `codepoint`
    pub fn contains(&self, codepoint: u32) -> bool {
        self.get(codepoint) != INDEX_NOT_FOUND
    }

    /// Store `index` for `codepoint`. Code points past the Unicode range
    /// are ignored.
    pub fn insert(&mut self, codepoint: u32, index: GlyphIndex) {
        if codepoint >= UNICODE_LIMIT {
            return;
        }
        let (outer, inner, leaf) = Self::split(codepoint);

        if self.outer.is_empty() {
            self.outer.resize_with(OUTER_BUCKETS, || None);
        }
        let bucket = self.outer[outer].get_or_insert_with(InnerBucket::new);
        let values = bucket.leaves[inner].get_or_insert_with(|| Box::new([INDEX_NOT_FOUND; BUCKET_SIZE]));

        if values[leaf] == INDEX_NOT_FOUND {
            self.len += 1;
        }
        values[leaf] = index;
    }

    /// Number of code points with a stored index
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been inserted since creation or the last clear
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.outer.clear();
        self.len = 0;
    }
}

/// Glyph index lookup bound to one character map of a face
pub struct CodepointIndexCache {
    encoding: Encoding,
    low: [GlyphIndex; MAX_PRECOMPUTED],
    sparse: SparseIndexMap,
}

impl CodepointIndexCache {
    /// Attach to the face's active character map, selecting the first one
    /// if none is active, and resolve the first 128 code points
    pub fn attach<F: FontFace + ?Sized>(face: &mut F) -> FontResult<Self> {
        let encoding = match face.active_charmap() {
            Some(encoding) => encoding,
            None => {
                let first = *face.charmaps().first().ok_or(FontError::NoCharmap)?;
                face.select_charmap(first)?;
                first
            }
        };

        let mut low = [0; MAX_PRECOMPUTED];
        for (codepoint, index) in (0u32..).zip(low.iter_mut()) {
            *index = face.char_index(codepoint);
        }

        Ok(Self {
            encoding,
            low,
            sparse: SparseIndexMap::new(),
        })
    }

    /// Character map the cache was filled from
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Switch the face to another character map
    ///
    /// Clears the sparse table. The eager table for the first 128 code
    /// points keeps the indices of the previous map.
    pub fn select_charmap<F: FontFace + ?Sized>(&mut self, face: &mut F, encoding: Encoding) -> FontResult<()> {
        if self.encoding == encoding {
            return Ok(());
        }
        face.select_charmap(encoding)?;
        log::debug!("Switched charmap {:?} -> {:?}", self.encoding, encoding);
        self.encoding = encoding;
        self.sparse.clear();
        Ok(())
    }

    /// Cached glyph index, 0 when the code point was never resolved
    pub fn resolve(&self, codepoint: u32) -> GlyphIndex {
        match usize::try_from(codepoint) {
            Ok(cp) if cp < MAX_PRECOMPUTED => self.low[cp],
            _ => self.sparse.find(codepoint),
        }
    }

    /// Record the glyph index of a code point above the eager range
    pub fn insert(&mut self, codepoint: u32, index: GlyphIndex) {
        if codepoint as usize >= MAX_PRECOMPUTED {
            self.sparse.insert(codepoint, index);
        }
    }

    /// Resolve through the cache, asking the face and caching the answer on
    /// a miss
    pub fn font_index<F: FontFace + ?Sized>(&mut self, face: &F, codepoint: u32) -> GlyphIndex {
        if (codepoint as usize) < MAX_PRECOMPUTED {
            return self.low[codepoint as usize];
        }
        if codepoint >= UNICODE_LIMIT {
            return 0;
        }
        if self.sparse.contains(codepoint) {
            return self.sparse.find(codepoint);
        }

        let index = face.char_index(codepoint);
        self.sparse.insert(codepoint, index);
        index
    }

    /// Number of cached code points above the eager range
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }
}
