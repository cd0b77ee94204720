use crate::tools::registry::{
    str_arg, ParamType, ParameterSchema, ParameterSpec, ToolArgs, ToolDefinition, ToolResult,
};

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "echo",
        "Echo tool - returns the input text",
        ParameterSchema::new(vec![ParameterSpec::required(
            "text",
            ParamType::String,
            "Text to echo back",
        )]),
        |args| Ok(echo(args)),
    )
}

fn echo(args: &ToolArgs) -> ToolResult {
    match str_arg(args, "text") {
        Some(text) => ToolResult::ok(text.replace('\0', "")),
        None => ToolResult::failure("Input must be a string"),
    }
}
