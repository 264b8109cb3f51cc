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

//! Shared fixtures: a device over the software backend and a textured shader pair.

#![allow(dead_code)]

use ember_core::asset::InMemoryAssets;
use ember_core::renderer::api::*;
use ember_core::renderer::rhi::{Device, Pipeline, PipelineDesc, Shader};
use ember_infra::graphics::{HlslCompiler, SoftDevice};
use std::sync::Arc;

pub const TEXTURED_VS: &str = r#"
    cbuffer Transform : register(b0) { float4x4 world_view_proj; };
    struct VsIn { float3 position : POSITION; float2 uv : TEXCOORD0; };
    struct VsOut { float4 position : SV_Position; float2 uv : TEXCOORD0; };
    VsOut vs_main(VsIn input) {
        VsOut output;
        output.position = mul(float4(input.position, 1.0), world_view_proj);
        output.uv = input.uv;
        return output;
    }
"#;

pub const TEXTURED_PS: &str = r#"
    Texture2D albedo : register(t0);
    SamplerState albedo_sampler : register(s0);
    struct VsOut { float4 position : SV_Position; float2 uv : TEXCOORD0; };
    float4 ps_main(VsOut input) : SV_Target {
        return albedo.Sample(albedo_sampler, input.uv);
    }
"#;

/// A device over a fresh software backend, with validation and leak checks on.
pub fn device_with_assets(assets: Arc<InMemoryAssets>) -> (Device, SoftDevice) {
    ember_infra::logging::init_test_logging();
    let soft = SoftDevice::new();
    let settings = DeviceSettings {
        leak_check: true,
        validate_bindings: true,
        label: "test device".to_string(),
        ..Default::default()
    };
    let device = Device::new(Arc::new(soft.clone()), Arc::new(HlslCompiler::new()), assets, settings);
    (device, soft)
}

pub fn device() -> (Device, SoftDevice) {
    device_with_assets(Arc::new(InMemoryAssets::new()))
}

pub fn inline_shader(device: &Device, stage: ShaderStage, source: &str, entry_point: &str) -> Arc<Shader> {
    device
        .create_shader(&ShaderInfo {
            label: Some(entry_point),
            stage,
            source: ShaderSource::Code(source.into()),
            entry_point,
        })
        .unwrap()
}

pub fn textured_input_layout() -> InputLayout {
    InputLayout {
        elements: vec![
            InputElement::per_vertex("POSITION", 0, VertexFormat::Float32x3),
            InputElement::per_vertex("TEXCOORD", 0, VertexFormat::Float32x2),
        ],
        topology: PrimitiveTopology::TriangleList,
    }
}

/// The vertex/pixel pair with one constant buffer, one texture and one sampler.
pub fn textured_pipeline(device: &Device) -> Arc<Pipeline> {
    let vs = inline_shader(device, ShaderStage::Vertex, TEXTURED_VS, "vs_main");
    let ps = inline_shader(device, ShaderStage::Pixel, TEXTURED_PS, "ps_main");
    device
        .create_pipeline(
            &PipelineDesc {
                label: Some("textured".into()),
                input_layout: textured_input_layout(),
                ..Default::default()
            }
            .with_shader(&vs)
            .with_shader(&ps),
        )
        .unwrap()
}

pub fn constant_buffer(device: &Device, size: u32) -> Arc<ember_core::renderer::rhi::Buffer> {
    device
        .create_buffer(&BufferDesc {
            label: Some("constants".into()),
            element_size: size,
            element_count: 1,
            usage: Usage::Dynamic,
            cpu_access: CpuAccess::Write,
            bind_flags: BindFlags::CONSTANT_BUFFER,
            ..Default::default()
        })
        .unwrap()
}
