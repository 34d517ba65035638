use serde_json::Value;

use crate::cmd::OutputFormat;

pub fn render_output(value: &Value, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            }
        },

        // yaml is always indented
        OutputFormat::Yaml => serde_yml::to_string(value)?,

        OutputFormat::Standard => {
            let mut out = String::new();
            render_human_readable(value, 0, &mut out);
            out
        }
    };

    Ok(rendered)
}

pub fn print_output(value: &Value, format: OutputFormat, pretty: bool) -> anyhow::Result<()> {
    let rendered = render_output(value, format, pretty)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn render_human_readable(value: &Value, indent: usize, out: &mut String) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                out.push_str(&format!("{:indent$}{}:", "", k, indent = indent));
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        out.push('\n');
                        render_human_readable(v, indent + 2, out);
                    },
                    _ => out.push_str(&format!(" {}\n", render_scalar(v))),
                }
            }
        },
        Value::Array(arr) => {
            for v in arr {
                out.push_str(&format!("{:indent$}-", "", indent = indent));
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        out.push('\n');
                        render_human_readable(v, indent + 2, out);
                    },
                    _ => out.push_str(&format!(" {}\n", render_scalar(v))),
                }
            }
        },
        _ => out.push_str(&format!("{:indent$}{}\n", "", render_scalar(value), indent = indent)),
    }
}
