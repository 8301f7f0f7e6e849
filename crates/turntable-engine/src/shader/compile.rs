use super::{ShaderError, ShaderStage};

/// Compiles one WGSL stage.
///
/// Compiler messages of error severity are collected into
/// [`ShaderError::Compile`]; validation errors raised while creating the module
/// are captured with an error scope instead of reaching the device's
/// uncaptured-error handler.
pub fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "turntable vertex shader",
            ShaderStage::Fragment => "turntable fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let scoped = pollster::block_on(scope.pop());

    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if !errors.is_empty() {
        return Err(ShaderError::Compile {
            stage,
            log: errors.join("\n"),
        });
    }

    if let Some(err) = scoped {
        return Err(ShaderError::Compile {
            stage,
            log: err.to_string(),
        });
    }

    log::debug!("compiled {stage} shader ({} bytes)", source.len());
    Ok(module)
}
