//! Synthetic TrueType fonts for tests.
//!
//! Self-contained on purpose: the sfnt framing here is written independently
//! of the crate's own writer, so directory and subset tests check against a
//! second implementation. Also compiled into `tests/integration.rs`.

#![allow(dead_code)]

pub const ARG_WORDS: u16 = 0x0001;
pub const MORE: u16 = 0x0020;
pub const SCALE: u16 = 0x0008;
pub const XY_SCALE: u16 = 0x0040;
pub const TWO_BY_TWO: u16 = 0x0080;

/// Builder for a minimal but structurally valid TrueType font.
pub struct TestFont {
    glyphs: Vec<Vec<u8>>,
    advances: Option<Vec<u16>>,
    units_per_em: u16,
    short_loca: bool,
    cmap: Option<Vec<u8>>,
    extra: Vec<([u8; 4], Vec<u8>)>,
    removed: Vec<[u8; 4]>,
    ascender: i16,
    descender: i16,
    italic_angle: i16,
    fixed_pitch: bool,
    postscript_name: Option<String>,
}

impl Default for TestFont {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFont {
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            advances: None,
            units_per_em: 1000,
            short_loca: false,
            cmap: None,
            extra: Vec::new(),
            removed: Vec::new(),
            ascender: 800,
            descender: -200,
            italic_angle: 0,
            fixed_pitch: false,
            postscript_name: None,
        }
    }

    pub fn short_loca(mut self) -> Self {
        self.short_loca = true;
        self
    }

    /// Append a glyph with the given raw `glyf` bytes (empty = no outline).
    pub fn glyph(mut self, data: Vec<u8>) -> Self {
        self.glyphs.push(data);
        self
    }

    /// Advance widths for the first `advances.len()` glyphs; later glyphs
    /// reuse the last advance (numberOfHMetrics = advances.len()).
    pub fn advances(mut self, advances: &[u16]) -> Self {
        self.advances = Some(advances.to_vec());
        self
    }

    pub fn units_per_em(mut self, upem: u16) -> Self {
        self.units_per_em = upem;
        self
    }

    /// A cmap with one Windows Unicode BMP (3,1) format 4 subtable.
    pub fn unicode_cmap(mut self, map: &[(u16, u16)]) -> Self {
        self.cmap = Some(cmap_table(&[(3, 1, format4_subtable(map))]));
        self
    }

    /// A cmap assembled from explicit (platform, encoding, subtable) records.
    pub fn cmap_records(mut self, records: &[(u16, u16, Vec<u8>)]) -> Self {
        self.cmap = Some(cmap_table(records));
        self
    }

    pub fn table(mut self, tag: [u8; 4], data: Vec<u8>) -> Self {
        self.extra.push((tag, data));
        self
    }

    pub fn without_table(mut self, tag: [u8; 4]) -> Self {
        self.removed.push(tag);
        self
    }

    pub fn metrics(mut self, ascender: i16, descender: i16) -> Self {
        self.ascender = ascender;
        self.descender = descender;
        self
    }

    pub fn italic_angle(mut self, degrees: i16) -> Self {
        self.italic_angle = degrees;
        self
    }

    pub fn fixed_pitch(mut self) -> Self {
        self.fixed_pitch = true;
        self
    }

    pub fn postscript_name(mut self, name: &str) -> Self {
        self.postscript_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut glyf = Vec::new();
        let mut offsets = Vec::new();
        for g in &self.glyphs {
            offsets.push(glyf.len() as u32);
            glyf.extend_from_slice(g);
        }
        offsets.push(glyf.len() as u32);

        let mut loca = Vec::new();
        for &o in &offsets {
            if self.short_loca {
                loca.extend_from_slice(&((o / 2) as u16).to_be_bytes());
            } else {
                loca.extend_from_slice(&o.to_be_bytes());
            }
        }

        let num_glyphs = self.glyphs.len() as u16;
        let advances = self
            .advances
            .clone()
            .unwrap_or_else(|| vec![500; self.glyphs.len().max(1)]);

        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"head", head_table(self.units_per_em, self.short_loca)),
            (*b"hhea", hhea_table(self.ascender, self.descender, advances.len() as u16)),
            (*b"maxp", maxp_table(num_glyphs)),
            (*b"hmtx", hmtx_table(&advances, self.glyphs.len())),
            (
                *b"cmap",
                self.cmap
                    .clone()
                    .unwrap_or_else(|| cmap_table(&[(3, 1, format4_subtable(&[]))])),
            ),
            (*b"post", post_table(self.italic_angle, self.fixed_pitch)),
            (*b"loca", loca),
            (*b"glyf", glyf),
        ];
        if let Some(name) = &self.postscript_name {
            let utf16: Vec<u8> = name.encode_utf16().flat_map(|c| c.to_be_bytes()).collect();
            tables.push((*b"name", name_table(&[(3, 1, 0x0409, 6, utf16)])));
        }
        tables.extend(self.extra.iter().cloned());
        tables.retain(|(tag, _)| !self.removed.contains(tag));
        write_font(tables)
    }
}

/// Independent sfnt writer: sorted directory, 4-byte aligned tables.
pub fn write_font(mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by(|a, b| a.0.cmp(&b.0));
    let n = tables.len() as u16;
    let mut es = 0u16;
    while (1u16 << (es + 1)) <= n {
        es += 1;
    }
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&n.to_be_bytes());
    out.extend_from_slice(&((1u16 << es) * 16).to_be_bytes());
    out.extend_from_slice(&es.to_be_bytes());
    out.extend_from_slice(&((n - (1u16 << es)) * 16).to_be_bytes());

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        out.extend_from_slice(&checksum(data).to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += (data.len() + 3) & !3;
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}

pub fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

/// Locate a table in a font file: (offset, length).
pub fn find_table(font: &[u8], tag: &[u8; 4]) -> Option<(usize, usize)> {
    let n = u16::from_be_bytes([font[4], font[5]]) as usize;
    (0..n).find_map(|i| {
        let rec = 12 + i * 16;
        if &font[rec..rec + 4] == tag {
            let off = u32::from_be_bytes(font[rec + 8..rec + 12].try_into().unwrap()) as usize;
            let len = u32::from_be_bytes(font[rec + 12..rec + 16].try_into().unwrap()) as usize;
            Some((off, len))
        } else {
            None
        }
    })
}

/// Directory checksum recorded for `tag`.
pub fn directory_checksum(font: &[u8], tag: &[u8; 4]) -> Option<u32> {
    let n = u16::from_be_bytes([font[4], font[5]]) as usize;
    (0..n).find_map(|i| {
        let rec = 12 + i * 16;
        (&font[rec..rec + 4] == tag)
            .then(|| u32::from_be_bytes(font[rec + 4..rec + 8].try_into().unwrap()))
    })
}

/// Glyph byte spans of a font, read back through its own loca.
pub fn glyph_bytes(font: &[u8], glyph: usize) -> Vec<u8> {
    let (head, _) = find_table(font, b"head").unwrap();
    let short = font[head + 51] == 0;
    let (loca, _) = find_table(font, b"loca").unwrap();
    let (glyf, _) = find_table(font, b"glyf").unwrap();
    let entry = |i: usize| -> usize {
        if short {
            u16::from_be_bytes([font[loca + 2 * i], font[loca + 2 * i + 1]]) as usize * 2
        } else {
            u32::from_be_bytes(font[loca + 4 * i..loca + 4 * i + 4].try_into().unwrap()) as usize
        }
    };
    font[glyf + entry(glyph)..glyf + entry(glyph + 1)].to_vec()
}

/// A simple glyph with `contours` one-point contours. Always even-length.
pub fn simple_glyph(contours: i16) -> Vec<u8> {
    let n = contours.max(0) as usize;
    let mut g = Vec::new();
    g.extend_from_slice(&contours.to_be_bytes());
    for v in [0i16, 0, contours * 10, contours * 20] {
        g.extend_from_slice(&v.to_be_bytes());
    }
    for i in 0..n {
        g.extend_from_slice(&(i as u16).to_be_bytes());
    }
    g.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
    // on-curve, x and y repeated from previous point: no coordinate bytes
    g.extend(std::iter::repeat(0x31u8).take(n));
    if g.len() % 2 != 0 {
        g.push(0);
    }
    g
}

/// A composite glyph. `MORE_COMPONENTS` is set automatically on all but the
/// last record; argument and transform bytes are sized from the flags.
pub fn composite_glyph(components: &[(u16, u16)]) -> Vec<u8> {
    let mut g = Vec::new();
    g.extend_from_slice(&(-1i16).to_be_bytes());
    g.extend_from_slice(&[0u8; 8]);
    for (i, &(glyph, flags)) in components.iter().enumerate() {
        let mut flags = flags & !MORE;
        if i + 1 < components.len() {
            flags |= MORE;
        }
        g.extend_from_slice(&flags.to_be_bytes());
        g.extend_from_slice(&glyph.to_be_bytes());
        let args = if flags & ARG_WORDS != 0 { 4 } else { 2 };
        let transform = if flags & SCALE != 0 {
            2
        } else if flags & XY_SCALE != 0 {
            4
        } else if flags & TWO_BY_TWO != 0 {
            8
        } else {
            0
        };
        g.extend(std::iter::repeat(0x11u8).take(args + transform));
    }
    if g.len() % 2 != 0 {
        g.push(0);
    }
    g
}

// ─── Tables ─────────────────────────────────────────────────────

fn head_table(units_per_em: u16, short_loca: bool) -> Vec<u8> {
    let mut t = vec![0u8; 54];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    t[18..20].copy_from_slice(&units_per_em.to_be_bytes());
    t[36..38].copy_from_slice(&(-50i16).to_be_bytes());
    t[38..40].copy_from_slice(&(-210i16).to_be_bytes());
    t[40..42].copy_from_slice(&950i16.to_be_bytes());
    t[42..44].copy_from_slice(&890i16.to_be_bytes());
    t[50..52].copy_from_slice(&(if short_loca { 0i16 } else { 1 }).to_be_bytes());
    t
}

fn hhea_table(ascender: i16, descender: i16, num_h_metrics: u16) -> Vec<u8> {
    let mut t = vec![0u8; 36];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[4..6].copy_from_slice(&ascender.to_be_bytes());
    t[6..8].copy_from_slice(&descender.to_be_bytes());
    t[34..36].copy_from_slice(&num_h_metrics.to_be_bytes());
    t
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = vec![0u8; 32];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[4..6].copy_from_slice(&num_glyphs.to_be_bytes());
    t
}

fn hmtx_table(advances: &[u16], num_glyphs: usize) -> Vec<u8> {
    let mut t = Vec::new();
    for &aw in advances {
        t.extend_from_slice(&aw.to_be_bytes());
        t.extend_from_slice(&0i16.to_be_bytes());
    }
    for _ in advances.len()..num_glyphs {
        t.extend_from_slice(&0i16.to_be_bytes());
    }
    t
}

fn post_table(italic_angle: i16, fixed_pitch: bool) -> Vec<u8> {
    let mut t = vec![0u8; 32];
    t[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());
    t[4..6].copy_from_slice(&italic_angle.to_be_bytes());
    t[12..16].copy_from_slice(&(fixed_pitch as u32).to_be_bytes());
    t
}

/// `name` table from (platform, encoding, language, nameID, raw bytes).
pub fn name_table(records: &[(u16, u16, u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&(records.len() as u16).to_be_bytes());
    t.extend_from_slice(&((6 + records.len() * 12) as u16).to_be_bytes());
    let mut strings = Vec::new();
    for (platform, encoding, language, name_id, bytes) in records {
        for v in [*platform, *encoding, *language, *name_id, bytes.len() as u16, strings.len() as u16] {
            t.extend_from_slice(&v.to_be_bytes());
        }
        strings.extend_from_slice(bytes);
    }
    t.extend_from_slice(&strings);
    t
}

/// `cmap` table from (platform, encoding, subtable) records.
pub fn cmap_table(records: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&(records.len() as u16).to_be_bytes());
    let mut offset = 4 + records.len() * 8;
    for (platform, encoding, sub) in records {
        t.extend_from_slice(&platform.to_be_bytes());
        t.extend_from_slice(&encoding.to_be_bytes());
        t.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += sub.len();
    }
    for (_, _, sub) in records {
        t.extend_from_slice(sub);
    }
    t
}

pub fn format0_subtable(map: &[(u8, u8)]) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&262u16.to_be_bytes());
    t.extend_from_slice(&0u16.to_be_bytes());
    let mut glyphs = [0u8; 256];
    for &(code, glyph) in map {
        glyphs[code as usize] = glyph;
    }
    t.extend_from_slice(&glyphs);
    t
}

pub fn format6_subtable(first_code: u16, glyphs: &[u16]) -> Vec<u8> {
    let mut t = Vec::new();
    for v in [6u16, (10 + glyphs.len() * 2) as u16, 0, first_code, glyphs.len() as u16] {
        t.extend_from_slice(&v.to_be_bytes());
    }
    for g in glyphs {
        t.extend_from_slice(&g.to_be_bytes());
    }
    t
}

/// Format 12 from (startChar, endChar, startGlyph) groups.
pub fn format12_subtable(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&12u16.to_be_bytes());
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&((16 + groups.len() * 12) as u32).to_be_bytes());
    t.extend_from_slice(&0u32.to_be_bytes());
    t.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for &(start, end, glyph) in groups {
        t.extend_from_slice(&start.to_be_bytes());
        t.extend_from_slice(&end.to_be_bytes());
        t.extend_from_slice(&glyph.to_be_bytes());
    }
    t
}

/// Format 4 from (code, glyph) pairs: contiguous codes share a segment
/// addressed through glyphIdArray, single codes use idDelta.
pub fn format4_subtable(char_to_gid: &[(u16, u16)]) -> Vec<u8> {
    let mut sorted = char_to_gid.to_vec();
    sorted.sort_by_key(|(ch, _)| *ch);

    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    for &(ch, gid) in &sorted {
        if let Some(last) = segments.last_mut() {
            if ch == last.1 + 1 {
                last.1 = ch;
                last.2.push(gid);
                continue;
            }
        }
        segments.push((ch, ch, vec![gid]));
    }
    segments.push((0xFFFF, 0xFFFF, vec![0]));

    let seg_count = segments.len() as u16;
    let mut es = 0u16;
    while (1u16 << (es + 1)) <= seg_count {
        es += 1;
    }
    let search_range = (1u16 << es) * 2;
    let range_shift = seg_count * 2 - search_range;

    let mut glyph_id_array: Vec<u16> = Vec::new();
    let (mut ends, mut starts, mut deltas, mut range_offsets) = (vec![], vec![], vec![], vec![]);
    for (i, (start, end, gids)) in segments.iter().enumerate() {
        starts.push(*start);
        ends.push(*end);
        if *start == 0xFFFF {
            deltas.push(1i16);
            range_offsets.push(0u16);
        } else if gids.len() == 1 {
            deltas.push((gids[0] as i32 - *start as i32) as i16);
            range_offsets.push(0);
        } else {
            deltas.push(0);
            let remaining = (segments.len() - i) as u16;
            range_offsets.push((remaining + glyph_id_array.len() as u16) * 2);
            glyph_id_array.extend_from_slice(gids);
        }
    }

    let mut t = Vec::new();
    let len = 16 + seg_count as usize * 8 + glyph_id_array.len() * 2;
    for v in [4u16, len as u16, 0, seg_count * 2, search_range, es, range_shift] {
        t.extend_from_slice(&v.to_be_bytes());
    }
    for v in &ends {
        t.extend_from_slice(&v.to_be_bytes());
    }
    t.extend_from_slice(&0u16.to_be_bytes());
    for v in &starts {
        t.extend_from_slice(&v.to_be_bytes());
    }
    for v in &deltas {
        t.extend_from_slice(&v.to_be_bytes());
    }
    for v in &range_offsets {
        t.extend_from_slice(&v.to_be_bytes());
    }
    for v in &glyph_id_array {
        t.extend_from_slice(&v.to_be_bytes());
    }
    t
}

// ─── GSUB ───────────────────────────────────────────────────────

fn coverage_format1(glyphs: &[u16]) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&(glyphs.len() as u16).to_be_bytes());
    for g in glyphs {
        t.extend_from_slice(&g.to_be_bytes());
    }
    t
}

/// Ligature substitution subtable (format 1) from (components, ligature) rules.
pub fn ligature_subst(rules: &[(Vec<u16>, u16)]) -> Vec<u8> {
    let mut firsts: Vec<u16> = rules.iter().map(|(c, _)| c[0]).collect();
    firsts.sort();
    firsts.dedup();

    let header_len = 6 + firsts.len() * 2;
    let mut sets: Vec<Vec<u8>> = Vec::new();
    for first in &firsts {
        let ligs: Vec<&(Vec<u16>, u16)> = rules.iter().filter(|(c, _)| c[0] == *first).collect();
        let mut set = Vec::new();
        set.extend_from_slice(&(ligs.len() as u16).to_be_bytes());
        let mut lig_offset = 2 + ligs.len() * 2;
        let mut bodies = Vec::new();
        for (components, glyph) in &ligs {
            set.extend_from_slice(&(lig_offset as u16).to_be_bytes());
            let mut body = Vec::new();
            body.extend_from_slice(&glyph.to_be_bytes());
            body.extend_from_slice(&(components.len() as u16).to_be_bytes());
            for c in &components[1..] {
                body.extend_from_slice(&c.to_be_bytes());
            }
            lig_offset += body.len();
            bodies.extend(body);
        }
        set.extend(bodies);
        sets.push(set);
    }

    let mut offset = header_len;
    let mut set_offsets = Vec::new();
    for s in &sets {
        set_offsets.push(offset as u16);
        offset += s.len();
    }
    let coverage_offset = offset as u16;

    let mut t = Vec::new();
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&coverage_offset.to_be_bytes());
    t.extend_from_slice(&(firsts.len() as u16).to_be_bytes());
    for o in set_offsets {
        t.extend_from_slice(&o.to_be_bytes());
    }
    for s in sets {
        t.extend(s);
    }
    t.extend(coverage_format1(&firsts));
    t
}

/// Single substitution subtable, format 2.
pub fn single_subst(pairs: &[(u16, u16)]) -> Vec<u8> {
    let mut sorted = pairs.to_vec();
    sorted.sort();
    let coverage_offset = 6 + sorted.len() * 2;
    let mut t = Vec::new();
    t.extend_from_slice(&2u16.to_be_bytes());
    t.extend_from_slice(&(coverage_offset as u16).to_be_bytes());
    t.extend_from_slice(&(sorted.len() as u16).to_be_bytes());
    for (_, to) in &sorted {
        t.extend_from_slice(&to.to_be_bytes());
    }
    let from: Vec<u16> = sorted.iter().map(|(f, _)| *f).collect();
    t.extend(coverage_format1(&from));
    t
}

/// Wrap a subtable into an extension (type 7) subtable of `lookup_type`.
pub fn extension_subst(lookup_type: u16, subtable: Vec<u8>) -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&lookup_type.to_be_bytes());
    t.extend_from_slice(&8u32.to_be_bytes());
    t.extend(subtable);
    t
}

/// A GSUB table with one script/feature; every lookup belongs to it.
/// Lookups are (lookupType, subtables).
pub fn gsub_table(script: &[u8; 4], lookups: &[(u16, Vec<Vec<u8>>)]) -> Vec<u8> {
    // ScriptList: 1 script -> default LangSys with feature index 0
    let mut script_list = Vec::new();
    script_list.extend_from_slice(&1u16.to_be_bytes());
    script_list.extend_from_slice(script);
    script_list.extend_from_slice(&8u16.to_be_bytes());
    // Script table at 8: defaultLangSys offset 4, langSysCount 0
    script_list.extend_from_slice(&4u16.to_be_bytes());
    script_list.extend_from_slice(&0u16.to_be_bytes());
    // LangSys: lookupOrder, reqFeatureIndex, featureIndexCount, [0]
    for v in [0u16, 0xFFFF, 1, 0] {
        script_list.extend_from_slice(&v.to_be_bytes());
    }

    let mut feature_list = Vec::new();
    feature_list.extend_from_slice(&1u16.to_be_bytes());
    feature_list.extend_from_slice(b"liga");
    feature_list.extend_from_slice(&8u16.to_be_bytes());
    feature_list.extend_from_slice(&0u16.to_be_bytes());
    feature_list.extend_from_slice(&(lookups.len() as u16).to_be_bytes());
    for i in 0..lookups.len() {
        feature_list.extend_from_slice(&(i as u16).to_be_bytes());
    }

    let mut lookup_tables: Vec<Vec<u8>> = Vec::new();
    for (lookup_type, subtables) in lookups {
        let mut l = Vec::new();
        l.extend_from_slice(&lookup_type.to_be_bytes());
        l.extend_from_slice(&0u16.to_be_bytes());
        l.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
        let mut offset = 6 + subtables.len() * 2;
        for s in subtables {
            l.extend_from_slice(&(offset as u16).to_be_bytes());
            offset += s.len();
        }
        for s in subtables {
            l.extend_from_slice(s);
        }
        lookup_tables.push(l);
    }
    let mut lookup_list = Vec::new();
    lookup_list.extend_from_slice(&(lookups.len() as u16).to_be_bytes());
    let mut offset = 2 + lookups.len() * 2;
    for l in &lookup_tables {
        lookup_list.extend_from_slice(&(offset as u16).to_be_bytes());
        offset += l.len();
    }
    for l in lookup_tables {
        lookup_list.extend(l);
    }

    let script_off = 10;
    let feature_off = script_off + script_list.len();
    let lookup_off = feature_off + feature_list.len();
    let mut t = Vec::new();
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    t.extend_from_slice(&(script_off as u16).to_be_bytes());
    t.extend_from_slice(&(feature_off as u16).to_be_bytes());
    t.extend_from_slice(&(lookup_off as u16).to_be_bytes());
    t.extend(script_list);
    t.extend(feature_list);
    t.extend(lookup_list);
    t
}
