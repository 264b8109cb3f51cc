// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An HLSL front end that compiles to a reflection container.
//!
//! [`HlslCompiler`] checks the declaration-level structure of a shader, resolves which
//! globals the entry point can reach, assigns registers the way `fxc` does (explicit
//! registers first, then the lowest free range in declaration order) and records the result
//! in a [`ShaderContainer`]. Function bodies are not type-checked.

mod container;
mod lexer;
mod parser;

pub use self::container::{
    classify, register_count, stage_for_profile, ContainerResource, ResourceClass,
    ShaderContainer, SignatureElement, CONTAINER_MAGIC,
};

use self::parser::{Function, Program, Register};
use crate::graphics::soft::native::hresult;
use ember_core::renderer::api::{ReflectedBinding, ShaderStage};
use ember_core::renderer::error::BackendError;
use ember_core::renderer::traits::ShaderCompilerBackend;
use std::collections::{HashSet, VecDeque};

/// A compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Diagnostic {
    position: Option<(u32, u32)>,
    message: String,
}

impl Diagnostic {
    fn at(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            position: Some((line, column)),
            message: message.into(),
        }
    }

    fn global(message: impl Into<String>) -> Self {
        Self {
            position: None,
            message: message.into(),
        }
    }

    fn render(&self, source_name: &str) -> String {
        match self.position {
            Some((line, column)) => format!("{source_name}({line},{column}): error: {}", self.message),
            None => format!("{source_name}: error: {}", self.message),
        }
    }
}

/// A global that needs a register.
struct Candidate<'a> {
    name: &'a str,
    type_name: &'a str,
    register_class: char,
    count: u32,
    explicit: Option<Register>,
    line: u32,
}

/// The HLSL reflection front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct HlslCompiler;

impl HlslCompiler {
    /// Creates a compiler.
    pub fn new() -> Self {
        Self
    }

    fn compile_container(
        &self,
        source: &str,
        entry_point: &str,
        profile: &str,
    ) -> Result<ShaderContainer, Vec<Diagnostic>> {
        let stage = stage_for_profile(profile).ok_or_else(|| {
            vec![Diagnostic::global(format!("unsupported target profile '{profile}'"))]
        })?;

        let tokens = lexer::tokenize(source)
            .map_err(|e| vec![Diagnostic::at(e.line, e.column, e.message)])?;
        let program = parser::parse(&tokens)
            .map_err(|e| vec![Diagnostic::at(e.line, e.column, e.message)])?;

        let entry = program
            .functions
            .iter()
            .find(|f| f.name == entry_point)
            .ok_or_else(|| vec![Diagnostic::global(format!("entry point '{entry_point}' not found"))])?;

        let mut errors = Vec::new();
        if stage == ShaderStage::Compute && !entry.attributes.iter().any(|a| a == "numthreads") {
            errors.push(Diagnostic::at(
                entry.line,
                1,
                format!("compute entry point '{entry_point}' requires a numthreads attribute"),
            ));
        }

        let mentions = reachable_mentions(&program, entry);
        let candidates = used_globals(&program, &mentions);
        if !matches!(stage, ShaderStage::Pixel | ShaderStage::Compute) {
            for c in candidates.iter().filter(|c| c.register_class == 'u') {
                errors.push(Diagnostic::at(
                    c.line,
                    1,
                    format!("'{}': read-write resources are only available to pixel and compute shaders", c.name),
                ));
            }
        }
        let resources = assign_registers(&candidates, &mut errors);
        let inputs = input_signature(&program, entry, stage, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ShaderContainer {
            profile: profile.to_string(),
            entry_point: entry_point.to_string(),
            resources,
            inputs,
        })
    }
}

impl ShaderCompilerBackend for HlslCompiler {
    fn compile(
        &self,
        source: &str,
        source_name: &str,
        entry_point: &str,
        profile: &str,
    ) -> Result<Vec<u8>, BackendError> {
        let container = self
            .compile_container(source, entry_point, profile)
            .map_err(|diagnostics| {
                let text = diagnostics
                    .iter()
                    .map(|d| d.render(source_name))
                    .collect::<Vec<_>>()
                    .join("\n");
                BackendError::new(hresult::E_FAIL, text)
            })?;
        log::debug!(
            "Compiled '{}' ({}, {}) with {} resource bindings",
            source_name,
            entry_point,
            profile,
            container.resources.len()
        );
        container
            .encode()
            .map_err(|e| BackendError::new(hresult::E_FAIL, e))
    }

    fn reflect(&self, bytecode: &[u8]) -> Result<Vec<ReflectedBinding>, BackendError> {
        let container = ShaderContainer::decode(bytecode)
            .map_err(|e| BackendError::new(hresult::E_INVALIDARG, e))?;
        container
            .resources
            .iter()
            .map(|resource| {
                let class = classify(&resource.type_name).ok_or_else(|| {
                    BackendError::new(
                        hresult::E_INVALIDARG,
                        format!("unknown resource type '{}'", resource.type_name),
                    )
                })?;
                Ok(ReflectedBinding {
                    name: resource.name.clone(),
                    input_type: class.input_type,
                    dimension: class.dimension,
                    bind_point: resource.bind_point,
                    bind_count: resource.bind_count,
                })
            })
            .collect()
    }
}

/// Collects every identifier mentioned by the entry point and the functions it calls.
fn reachable_mentions(program: &Program, entry: &Function) -> HashSet<String> {
    let mut mentions = HashSet::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([entry]);
    visited.insert(entry.name.as_str());

    while let Some(function) = queue.pop_front() {
        for name in &function.mentions {
            mentions.insert(name.clone());
            if visited.contains(name.as_str()) {
                continue;
            }
            let callees: Vec<&Function> = program.functions.iter().filter(|f| &f.name == name).collect();
            if !callees.is_empty() {
                visited.insert(name.as_str());
                queue.extend(callees);
            }
        }
    }
    mentions
}

/// Lists the register-bound globals the entry point reaches, in declaration order.
fn used_globals<'a>(program: &'a Program, mentions: &HashSet<String>) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::new();
    if program.uniforms.iter().any(|u| mentions.contains(u)) {
        candidates.push(Candidate {
            name: "$Globals",
            type_name: "cbuffer",
            register_class: 'b',
            count: 1,
            explicit: None,
            line: 0,
        });
    }
    for block in &program.buffers {
        if block.members.iter().any(|m| mentions.contains(m)) {
            let type_name = if block.is_texture_buffer { "tbuffer" } else { "cbuffer" };
            candidates.push(Candidate {
                name: &block.name,
                type_name,
                register_class: if block.is_texture_buffer { 't' } else { 'b' },
                count: 1,
                explicit: block.register,
                line: block.line,
            });
        }
    }
    for resource in &program.resources {
        if !mentions.contains(&resource.name) {
            continue;
        }
        if let Some(class) = classify(&resource.type_name) {
            candidates.push(Candidate {
                name: &resource.name,
                type_name: &resource.type_name,
                register_class: class.register,
                count: resource.count,
                explicit: resource.register,
                line: resource.line,
            });
        }
    }
    candidates.sort_by_key(|c| c.line);
    candidates
}

/// Places every candidate, explicit registers first.
fn assign_registers(candidates: &[Candidate<'_>], errors: &mut Vec<Diagnostic>) -> Vec<ContainerResource> {
    // (class, start, end, name) of every placed range.
    let mut taken: Vec<(char, u32, u32, &str)> = Vec::new();
    let mut placed: Vec<Option<u32>> = vec![None; candidates.len()];

    for (i, c) in candidates.iter().enumerate() {
        let Some(register) = c.explicit else { continue };
        if register.class != c.register_class {
            errors.push(Diagnostic::at(
                register.line,
                1,
                format!(
                    "register class mismatch: '{}' is a {} and binds to '{}' registers, not '{}'",
                    c.name, c.type_name, c.register_class, register.class
                ),
            ));
            continue;
        }
        let Some(end) = register_range_end(c, register.index, errors) else {
            continue;
        };
        if let Some((_, _, _, other)) = taken
            .iter()
            .find(|(class, start, stop, _)| *class == c.register_class && register.index < *stop && *start < end)
        {
            errors.push(Diagnostic::at(
                register.line,
                1,
                format!(
                    "'{}' and '{}' overlap at register {}{}",
                    c.name, other, c.register_class, register.index
                ),
            ));
            continue;
        }
        taken.push((c.register_class, register.index, end, c.name));
        placed[i] = Some(register.index);
    }

    for (i, c) in candidates.iter().enumerate() {
        if c.explicit.is_some() {
            continue;
        }
        // Every placed range ends within the register file, so `start` stays bounded.
        let mut start = 0;
        let end = loop {
            let Some(end) = register_range_end(c, start, errors) else {
                break None;
            };
            let clash = taken
                .iter()
                .find(|(class, s, stop, _)| *class == c.register_class && start < *stop && *s < end)
                .map(|(_, _, stop, _)| *stop);
            match clash {
                Some(stop) => start = stop,
                None => break Some(end),
            }
        };
        if let Some(end) = end {
            taken.push((c.register_class, start, end, c.name));
            placed[i] = Some(start);
        }
    }

    candidates
        .iter()
        .zip(placed)
        .filter_map(|(c, start)| {
            Some(ContainerResource {
                name: c.name.to_string(),
                type_name: c.type_name.to_string(),
                bind_point: start?,
                bind_count: c.count,
            })
        })
        .collect()
}

/// Returns the exclusive end of `c` placed at `start`, or records why it does not fit.
fn register_range_end(c: &Candidate<'_>, start: u32, errors: &mut Vec<Diagnostic>) -> Option<u32> {
    let limit = register_count(c.register_class);
    match start.checked_add(c.count) {
        Some(end) if end <= limit => Some(end),
        _ => {
            errors.push(Diagnostic::at(
                c.line,
                1,
                format!(
                    "'{}' needs registers {}{}..{}{} but only {} are available",
                    c.name,
                    c.register_class,
                    start,
                    c.register_class,
                    u64::from(start) + u64::from(c.count),
                    limit
                ),
            ));
            None
        }
    }
}

/// Flattens the entry point's input parameters into signature elements.
fn input_signature(
    program: &Program,
    entry: &Function,
    stage: ShaderStage,
    errors: &mut Vec<Diagnostic>,
) -> Vec<SignatureElement> {
    let mut inputs = Vec::new();
    for param in entry.params.iter().filter(|p| !p.is_output) {
        if let Some(fields) = program.structs.get(&param.type_name) {
            for field in fields {
                match &field.semantic {
                    Some(semantic) => inputs.push(SignatureElement::parse(semantic)),
                    None if stage == ShaderStage::Vertex => errors.push(Diagnostic::at(
                        entry.line,
                        1,
                        format!("'{}.{}' is missing a semantic", param.type_name, field.name),
                    )),
                    None => {}
                }
            }
            continue;
        }
        match &param.semantic {
            Some(semantic) => inputs.push(SignatureElement::parse(semantic)),
            None if stage == ShaderStage::Vertex => errors.push(Diagnostic::at(
                entry.line,
                1,
                format!("parameter '{}' is missing a semantic", param.name),
            )),
            None => {}
        }
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::api::{ShaderInputType, ViewDimension};

    const VERTEX: &str = r#"
        cbuffer PerObject { float4x4 world; };
        cbuffer Unused { float4 never; };
        struct VSIn { float3 position : POSITION; float2 uv : TEXCOORD0; uint id : SV_VertexID; };
        float4 transform(float3 p) { return mul(float4(p, 1), world); }
        float4 main(VSIn input) : SV_Position { return transform(input.position); }
    "#;

    fn compile(source: &str, profile: &str) -> Result<ShaderContainer, String> {
        HlslCompiler
            .compile(source, "test.hlsl", "main", profile)
            .map(|bytes| ShaderContainer::decode(&bytes).unwrap())
            .map_err(|e| e.message)
    }

    #[test]
    fn only_reachable_resources_are_reflected() {
        let container = compile(VERTEX, "vs_5_0").unwrap();
        assert_eq!(container.resources.len(), 1);
        assert_eq!(container.resources[0].name, "PerObject");
        assert_eq!(container.resources[0].bind_point, 0);
        assert_eq!(
            container.inputs,
            vec![
                SignatureElement::parse("POSITION"),
                SignatureElement::parse("TEXCOORD0"),
                SignatureElement::parse("SV_VertexID"),
            ]
        );
    }

    #[test]
    fn automatic_registers_fill_the_lowest_free_range() {
        let source = r#"
            Texture2D a : register(t1);
            Texture2D b[2];
            Texture2D c;
            SamplerState s;
            float4 main(float2 uv : TEXCOORD) : SV_Target {
                return a.Sample(s, uv) + b[0].Sample(s, uv) + c.Sample(s, uv);
            }
        "#;
        let container = compile(source, "ps_5_0").unwrap();
        let slots: Vec<_> = container
            .resources
            .iter()
            .map(|r| (r.name.as_str(), r.bind_point, r.bind_count))
            .collect();
        // `b` needs two registers and t1 is taken, so it lands at t2.
        assert_eq!(slots, vec![("a", 1, 1), ("b", 2, 2), ("c", 0, 1), ("s", 0, 1)]);
    }

    #[test]
    fn uniform_globals_become_a_globals_buffer() {
        let source = "float time; cbuffer Frame { float4 tint; };\n\
                      float4 main() : SV_Target { return tint * time; }";
        let container = compile(source, "ps_5_0").unwrap();
        let names: Vec<_> = container.resources.iter().map(|r| (r.name.as_str(), r.bind_point)).collect();
        assert_eq!(names, vec![("$Globals", 0), ("Frame", 1)]);
    }

    #[test]
    fn register_errors_are_reported() {
        let mismatch = "Texture2D t : register(s0);\nfloat4 main() : SV_Target { return t.Load(0); }";
        assert!(compile(mismatch, "ps_5_0").unwrap_err().contains("register class mismatch"));

        let overlap = "Texture2D a[2] : register(t0);\nTexture2D b : register(t1);\n\
                       float4 main() : SV_Target { return a[0].Load(0) + b.Load(0); }";
        let err = compile(overlap, "ps_5_0").unwrap_err();
        assert!(err.starts_with("test.hlsl(2,1): error: 'b' and 'a' overlap"), "{err}");

        let limit = "SamplerState s[4] : register(s14);\nfloat4 main() : SV_Target { return s[0]; }";
        assert!(compile(limit, "ps_5_0").unwrap_err().contains("only 16 are available"));
    }

    #[test]
    fn registers_past_the_end_of_the_range_are_compile_errors() {
        let explicit = "Texture2D tex : register(t4294967295);\n\
                        float4 main() : SV_Target { return tex.Load(int3(0, 0, 0)); }";
        let err = compile(explicit, "ps_5_0").unwrap_err();
        assert!(err.contains("t4294967295..t4294967296 but only 128 are available"), "{err}");

        let huge_array = "Texture2D many[4294967295] : register(t2);\n\
                          float4 main() : SV_Target { return many[0].Load(0); }";
        assert!(compile(huge_array, "ps_5_0").unwrap_err().contains("only 128 are available"));

        let implicit = "SamplerState first : register(s1);\nSamplerState rest[4294967295];\n\
                        float4 main() : SV_Target { return first + rest[0]; }";
        assert!(compile(implicit, "ps_5_0").unwrap_err().contains("only 16 are available"));
    }

    #[test]
    fn stage_rules_are_enforced() {
        let uav = "RWTexture2D<float4> output;\nfloat4 main() : SV_Position { output[uint2(0,0)] = 0; return 0; }";
        assert!(compile(uav, "vs_5_0").unwrap_err().contains("only available to pixel and compute"));

        let compute = "RWTexture2D<float4> output;\nvoid main(uint3 id : SV_DispatchThreadID) { output[id.xy] = 1; }";
        assert!(compile(compute, "cs_5_0").unwrap_err().contains("numthreads"));
        let with_attribute = format!("[numthreads(8, 8, 1)]\n{}", compute.lines().nth(1).unwrap());
        let source = format!("{}\n{}", compute.lines().next().unwrap(), with_attribute);
        assert_eq!(compile(&source, "cs_5_0").unwrap().resources[0].type_name, "RWTexture2D");
    }

    #[test]
    fn missing_entry_point_and_syntax_errors() {
        let err = compile("float4 other() : SV_Target { return 0; }", "ps_5_0").unwrap_err();
        assert_eq!(err, "test.hlsl: error: entry point 'main' not found");

        let err = compile("float4 main() : SV_Target {\n return 0;\n}\n}", "ps_5_0").unwrap_err();
        assert_eq!(err, "test.hlsl(4,1): error: syntax error: unexpected token '}'");

        let err = compile(VERTEX, "xs_9_9").unwrap_err();
        assert!(err.contains("unsupported target profile"));
    }

    #[test]
    fn reflection_maps_type_names() {
        let source = r#"
            StructuredBuffer<float4> particles : register(t3);
            RWByteAddressBuffer counters;
            TextureCubeArray skyboxes;
            SamplerComparisonState shadowSampler;
            [numthreads(64, 1, 1)]
            void main(uint3 id : SV_DispatchThreadID) {
                counters.Store(0, particles[id.x].x + skyboxes.SampleCmpLevelZero(shadowSampler, 0, 0, 0));
            }
        "#;
        let bytes = HlslCompiler.compile(source, "cs.hlsl", "main", "cs_5_0").unwrap();
        let bindings = HlslCompiler.reflect(&bytes).unwrap();
        let summary: Vec<_> = bindings
            .iter()
            .map(|b| (b.name.as_str(), b.input_type, b.dimension, b.bind_point))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("particles", ShaderInputType::Structured, ViewDimension::Buffer, 3),
                ("counters", ShaderInputType::RwByteAddress, ViewDimension::Buffer, 0),
                ("skyboxes", ShaderInputType::Texture, ViewDimension::TextureCubeArray, 0),
                ("shadowSampler", ShaderInputType::Sampler, ViewDimension::Unknown, 0),
            ]
        );
        assert!(HlslCompiler.reflect(b"garbage").is_err());
    }
}
