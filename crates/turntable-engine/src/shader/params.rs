use std::collections::HashMap;

use crate::mesh::VertexLayout;

use super::{
    ShaderError, ShaderSource, ShaderStage, MODEL_VIEW_MATRIX, PROJECTION_MATRIX, SAMPLER,
    SAMPLER_FILTER,
};

/// What kind of slot a logical parameter occupies.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParamKind {
    Attribute,
    Uniform,
    Texture,
    Sampler,
}

/// A parameter the program must expose for a given mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Requirement {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Resolved location of a logical parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParamLocation {
    Attribute {
        location: u32,
    },
    Binding {
        kind: ParamKind,
        group: u32,
        binding: u32,
        visibility: wgpu::ShaderStages,
    },
}

/// Parameters a program needs to draw a mesh with `layout`.
///
/// Every vertex attribute of the layout, both matrices, and the texture +
/// sampler pair when the mesh carries texture coordinates.
pub fn requirements(layout: &VertexLayout) -> Vec<Requirement> {
    let mut reqs: Vec<Requirement> = layout
        .attributes
        .iter()
        .map(|a| Requirement {
            name: a.name,
            kind: ParamKind::Attribute,
        })
        .collect();

    reqs.push(Requirement { name: PROJECTION_MATRIX, kind: ParamKind::Uniform });
    reqs.push(Requirement { name: MODEL_VIEW_MATRIX, kind: ParamKind::Uniform });

    if layout.attribute(crate::mesh::TEX_COORD).is_some() {
        reqs.push(Requirement { name: SAMPLER, kind: ParamKind::Texture });
        reqs.push(Requirement { name: SAMPLER_FILTER, kind: ParamKind::Sampler });
    }

    reqs
}

/// Logical name -> location map plus the stage entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMap {
    vertex_entry: String,
    fragment_entry: String,
    params: HashMap<&'static str, ParamLocation>,
}

impl ParamMap {
    /// Resolves every requirement against the declarations in `source`.
    pub fn resolve(source: &ShaderSource, reqs: &[Requirement]) -> Result<Self, ShaderError> {
        let vs = Declarations::scan(&source.vertex);
        let fs = Declarations::scan(&source.fragment);

        let vertex_entry = vs
            .vertex_entries
            .first()
            .ok_or_else(|| ShaderError::Link("vertex stage declares no @vertex entry point".into()))?
            .to_string();
        let fragment_entry = fs
            .fragment_entries
            .first()
            .ok_or_else(|| {
                ShaderError::Link("fragment stage declares no @fragment entry point".into())
            })?
            .to_string();

        let mut params = HashMap::with_capacity(reqs.len());
        for req in reqs {
            let loc = match req.kind {
                ParamKind::Attribute => {
                    let location = vs.location(req.name).ok_or_else(|| {
                        ShaderError::Link(format!(
                            "attribute `{}` is not declared by the vertex stage",
                            req.name
                        ))
                    })?;
                    ParamLocation::Attribute { location }
                }
                kind => resolve_binding(req.name, kind, &vs, &fs)?,
            };
            params.insert(req.name, loc);
        }

        Ok(Self {
            vertex_entry,
            fragment_entry,
            params,
        })
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    pub fn get(&self, name: &str) -> Option<ParamLocation> {
        self.params.get(name).copied()
    }

    /// Shader location of a vertex attribute.
    pub fn attribute(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            ParamLocation::Attribute { location } => Some(location),
            ParamLocation::Binding { .. } => None,
        }
    }

    /// Binding slot of a uniform, texture or sampler.
    pub fn binding(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            ParamLocation::Binding { binding, .. } => Some(binding),
            ParamLocation::Attribute { .. } => None,
        }
    }

    /// All resolved bindings, ordered by slot.
    pub fn bindings(&self) -> Vec<(&'static str, ParamLocation)> {
        let mut out: Vec<_> = self
            .params
            .iter()
            .filter(|(_, loc)| matches!(loc, ParamLocation::Binding { .. }))
            .map(|(name, loc)| (*name, *loc))
            .collect();
        out.sort_by_key(|(_, loc)| match loc {
            ParamLocation::Binding { binding, .. } => *binding,
            ParamLocation::Attribute { .. } => u32::MAX,
        });
        out
    }
}

fn resolve_binding(
    name: &'static str,
    kind: ParamKind,
    vs: &Declarations<'_>,
    fs: &Declarations<'_>,
) -> Result<ParamLocation, ShaderError> {
    let mut found: Option<(u32, u32)> = None;
    let mut visibility = wgpu::ShaderStages::NONE;

    for (stage, decls) in [(ShaderStage::Vertex, vs), (ShaderStage::Fragment, fs)] {
        let Some(slot) = decls.binding(name) else { continue };
        if let Some(prev) = found {
            if prev != slot {
                return Err(ShaderError::Link(format!(
                    "`{name}` is bound at @group({}) @binding({}) in one stage and @group({}) @binding({}) in another",
                    prev.0, prev.1, slot.0, slot.1
                )));
            }
        }
        found = Some(slot);
        visibility |= stage.visibility();
    }

    let (group, binding) = found.ok_or_else(|| {
        ShaderError::Link(format!("`{name}` is not declared by either stage"))
    })?;

    if group != 0 {
        return Err(ShaderError::Link(format!(
            "`{name}` uses @group({group}); only group 0 is supported"
        )));
    }

    Ok(ParamLocation::Binding {
        kind,
        group,
        binding,
        visibility,
    })
}

// ── declaration scan ──────────────────────────────────────────────────────

/// Declarations picked out of one WGSL stage.
#[derive(Debug, Default)]
struct Declarations<'a> {
    /// `@location(n) name:` pairs.
    locations: Vec<(&'a str, u32)>,
    /// `@group(g) @binding(b) var name` triples.
    bindings: Vec<(&'a str, u32, u32)>,
    vertex_entries: Vec<&'a str>,
    fragment_entries: Vec<&'a str>,
}

impl<'a> Declarations<'a> {
    fn scan(src: &'a str) -> Self {
        let toks = tokenize(src);
        let mut out = Declarations::default();
        let mut pending: Vec<Attr<'a>> = Vec::new();
        let mut i = 0;

        while i < toks.len() {
            match toks[i] {
                Token::Punct('@') => {
                    let Some(Token::Ident(name)) = toks.get(i + 1).copied() else {
                        i += 1;
                        continue;
                    };
                    let mut j = i + 2;
                    let mut arg = None;
                    if toks.get(j) == Some(&Token::Punct('(')) {
                        arg = match toks.get(j + 1) {
                            Some(Token::Number(n)) | Some(Token::Ident(n)) => Some(*n),
                            _ => None,
                        };
                        while j < toks.len() && toks[j] != Token::Punct(')') {
                            j += 1;
                        }
                        j += 1;
                    }
                    pending.push(Attr { name, arg });
                    i = j;
                }
                Token::Ident("fn") => {
                    if let Some(Token::Ident(name)) = toks.get(i + 1).copied() {
                        if has_attr(&pending, "vertex") {
                            out.vertex_entries.push(name);
                        }
                        if has_attr(&pending, "fragment") {
                            out.fragment_entries.push(name);
                        }
                    }
                    pending.clear();
                    i += 1;
                }
                Token::Ident("var") => {
                    let mut j = i + 1;
                    if toks.get(j) == Some(&Token::Punct('<')) {
                        while j < toks.len() && toks[j] != Token::Punct('>') {
                            j += 1;
                        }
                        j += 1;
                    }
                    if let Some(Token::Ident(name)) = toks.get(j).copied() {
                        if let (Some(g), Some(b)) = (attr_u32(&pending, "group"), attr_u32(&pending, "binding")) {
                            out.bindings.push((name, g, b));
                        }
                    }
                    pending.clear();
                    i = j + 1;
                }
                Token::Ident(name) => {
                    if toks.get(i + 1) == Some(&Token::Punct(':')) {
                        if let Some(loc) = attr_u32(&pending, "location") {
                            out.locations.push((name, loc));
                        }
                    }
                    pending.clear();
                    i += 1;
                }
                _ => {
                    pending.clear();
                    i += 1;
                }
            }
        }

        out
    }

    fn location(&self, name: &str) -> Option<u32> {
        self.locations.iter().find(|(n, _)| *n == name).map(|(_, l)| *l)
    }

    fn binding(&self, name: &str) -> Option<(u32, u32)> {
        self.bindings
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, g, b)| (*g, *b))
    }
}

#[derive(Debug, Copy, Clone)]
struct Attr<'a> {
    name: &'a str,
    arg: Option<&'a str>,
}

fn has_attr(attrs: &[Attr<'_>], name: &str) -> bool {
    attrs.iter().any(|a| a.name == name)
}

fn attr_u32(attrs: &[Attr<'_>], name: &str) -> Option<u32> {
    let arg = attrs.iter().find(|a| a.name == name)?.arg?;
    arg.trim_end_matches(['u', 'i']).parse().ok()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Token<'a> {
    Ident(&'a str),
    Number(&'a str),
    Punct(char),
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let bytes = src.as_bytes();
    let mut toks = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
        } else if bytes[i..].starts_with(b"//") {
            i = src[i..].find('\n').map_or(bytes.len(), |n| i + n);
        } else if bytes[i..].starts_with(b"/*") {
            // Block comments nest in WGSL.
            let mut depth = 0usize;
            while i < bytes.len() {
                if bytes[i..].starts_with(b"/*") {
                    depth += 1;
                    i += 2;
                } else if bytes[i..].starts_with(b"*/") {
                    depth -= 1;
                    i += 2;
                    if depth == 0 {
                        break;
                    }
                } else {
                    i += 1;
                }
            }
        } else if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            toks.push(Token::Ident(&src[start..i]));
        } else if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'.') {
                i += 1;
            }
            toks.push(Token::Number(&src[start..i]));
        } else {
            let ch = src[i..].chars().next().unwrap_or('\0');
            toks.push(Token::Punct(ch));
            i += ch.len_utf8().max(1);
        }
    }

    toks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;

    const VS: &str = r#"
        @group(0) @binding(0) var<uniform> projectionMatrix: mat4x4<f32>;
        @group(0) @binding(1) var<uniform> modelViewMatrix: mat4x4<f32>;

        struct VertexOutput {
            @builtin(position) position: vec4<f32>,
            @location(0) uv: vec2<f32>,
        };

        // @location(9) commented: f32
        @vertex
        fn vs_main(@location(0) vertexPos: vec3<f32>, @location(1) texCoord: vec2<f32>) -> VertexOutput {
            var out: VertexOutput;
            out.position = projectionMatrix * modelViewMatrix * vec4<f32>(vertexPos, 1.0);
            out.uv = texCoord;
            return out;
        }
    "#;

    const FS: &str = r#"
        @group(0) @binding(2) var uSampler: texture_2d<f32>;
        @group(0) @binding(3) var uSamplerFilter: sampler;

        /* block /* nested */ comment */
        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            return textureSample(uSampler, uSamplerFilter, uv);
        }
    "#;

    fn textured_reqs() -> Vec<Requirement> {
        requirements(&shapes::textured_cube().vertex_layout())
    }

    #[test]
    fn scan_finds_locations_bindings_and_entries() {
        let d = Declarations::scan(VS);
        assert_eq!(d.location("vertexPos"), Some(0));
        assert_eq!(d.location("texCoord"), Some(1));
        assert_eq!(d.location("commented"), None);
        assert_eq!(d.binding("modelViewMatrix"), Some((0, 1)));
        assert_eq!(d.binding("out"), None);
        assert_eq!(d.vertex_entries, vec!["vs_main"]);
        assert!(d.fragment_entries.is_empty());
    }

    #[test]
    fn comments_may_hold_non_ascii_text() {
        let src = "/* rotation \u{3c0} rad, /* \u{e9}t\u{e9} */ */\n\
                   // \u{bd} turn\n\
                   @group(0) @binding(0) var<uniform> projectionMatrix: mat4x4<f32>;";
        let d = Declarations::scan(src);
        assert_eq!(d.binding("projectionMatrix"), Some((0, 0)));
    }

    #[test]
    fn unterminated_block_comment_hides_the_rest() {
        let d = Declarations::scan("/* open \u{3c0}\n@location(0) vertexPos: vec3<f32>");
        assert_eq!(d.location("vertexPos"), None);
    }

    #[test]
    fn requirements_follow_the_mesh_layout() {
        let names: Vec<_> = textured_reqs().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["vertexPos", "texCoord", PROJECTION_MATRIX, MODEL_VIEW_MATRIX, SAMPLER, SAMPLER_FILTER]
        );

        let square: Vec<_> = requirements(&shapes::square().vertex_layout())
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(square, vec!["vertexPos", PROJECTION_MATRIX, MODEL_VIEW_MATRIX]);
    }

    #[test]
    fn resolves_every_parameter_by_name() {
        let map = ParamMap::resolve(&ShaderSource::new(VS, FS), &textured_reqs()).unwrap();

        assert_eq!(map.vertex_entry(), "vs_main");
        assert_eq!(map.fragment_entry(), "fs_main");
        assert_eq!(map.attribute("vertexPos"), Some(0));
        assert_eq!(map.attribute("texCoord"), Some(1));
        assert_eq!(map.binding(PROJECTION_MATRIX), Some(0));
        assert_eq!(map.binding(SAMPLER_FILTER), Some(3));

        let Some(ParamLocation::Binding { visibility, kind, .. }) = map.get(SAMPLER) else {
            panic!("sampler resolves to a binding");
        };
        assert_eq!(visibility, wgpu::ShaderStages::FRAGMENT);
        assert_eq!(kind, ParamKind::Texture);

        let order: Vec<_> = map.bindings().iter().map(|(n, _)| *n).collect();
        assert_eq!(order, vec![PROJECTION_MATRIX, MODEL_VIEW_MATRIX, SAMPLER, SAMPLER_FILTER]);
    }

    #[test]
    fn missing_attribute_fails_to_link() {
        let vs = VS.replace("texCoord", "uvIn");
        let err = ParamMap::resolve(&ShaderSource::new(vs, FS), &textured_reqs()).unwrap_err();
        assert!(matches!(err, ShaderError::Link(msg) if msg.contains("texCoord")));
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let fs = FS.replace("@fragment", "");
        let err = ParamMap::resolve(&ShaderSource::new(VS, fs), &textured_reqs()).unwrap_err();
        assert!(matches!(err, ShaderError::Link(msg) if msg.contains("@fragment")));
    }

    #[test]
    fn conflicting_bindings_fail_to_link() {
        let fs = format!("@group(0) @binding(7) var<uniform> modelViewMatrix: mat4x4<f32>;\n{FS}");
        let err = ParamMap::resolve(&ShaderSource::new(VS, fs), &textured_reqs()).unwrap_err();
        assert!(matches!(err, ShaderError::Link(msg) if msg.contains("modelViewMatrix")));
    }

    #[test]
    fn non_zero_group_is_rejected() {
        let fs = FS.replace("@group(0) @binding(3)", "@group(1) @binding(0)");
        let err = ParamMap::resolve(&ShaderSource::new(VS, fs), &textured_reqs()).unwrap_err();
        assert!(matches!(err, ShaderError::Link(msg) if msg.contains("group(1)")));
    }

    #[test]
    fn shared_uniform_is_visible_to_both_stages() {
        let fs = format!("@group(0) @binding(1) var<uniform> modelViewMatrix: mat4x4<f32>;\n{FS}");
        let map = ParamMap::resolve(&ShaderSource::new(VS, fs), &textured_reqs()).unwrap();
        let Some(ParamLocation::Binding { visibility, .. }) = map.get(MODEL_VIEW_MATRIX) else {
            panic!("matrix resolves to a binding");
        };
        assert_eq!(visibility, wgpu::ShaderStages::VERTEX_FRAGMENT);
    }
}
