//! MCP (Model Context Protocol) server for the paint-by-numbers core.
//!
//! Exposes the core as a JSON-RPC 2.0 server over stdin/stdout. The server
//! plays the host: it registers a `ScriptHost`, forwards every request
//! through the plugin entrypoint and reports the results as JSON.

use std::io::{self, BufRead, Write};

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use emu_core::Observable;

use crate::capture::{self, UNSCALED};
use crate::config::Setting;
use crate::info;
use crate::plugin::{CoreError, Operation, Params, Plugin};
use crate::script::{PaintPoint, ScriptHost};

// ---------------------------------------------------------------------------
// JSON-RPC types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: JsonValue,
    id: JsonValue,
}

#[derive(Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: JsonValue,
}

#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const CORE_ERROR: i32 = -32000;

impl RpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    fn error(id: JsonValue, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError { code, message }),
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

/// MCP server wrapping one plugin instance.
pub struct McpServer {
    plugin: Plugin<ScriptHost>,
}

impl McpServer {
    /// A server with an enumerated plugin and a default canvas.
    #[must_use]
    pub fn new(paint_limit: Option<u32>) -> Self {
        let mut plugin = Plugin::new().with_paint_limit(paint_limit);
        let mut params = Params::EnumerateCores {
            host: Some(ScriptHost::default()),
            sysregions: None,
        };
        // Enumerate cannot fail for a matching record.
        if let Err(e) = plugin.dispatch(Operation::EnumerateCores.code(), &mut params) {
            log::error!("enumerate failed: {e}");
        }
        Self { plugin }
    }

    /// Run the server loop: read JSON-RPC from stdin, write responses to stdout.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(reply) = self.handle_line(&line) else {
                continue;
            };
            let _ = writeln!(stdout, "{reply}");
            let _ = stdout.flush();
        }
    }

    /// Answer one request line. Blank lines get no answer.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<RpcRequest>(line) {
            Err(e) => RpcResponse::error(JsonValue::Null, PARSE_ERROR, format!("Parse error: {e}")),
            Ok(request) if request.jsonrpc != "2.0" => RpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
            ),
            Ok(request) => self.dispatch(&request.method, &request.params, request.id),
        };
        Some(serde_json::to_string(&response).unwrap_or_default())
    }

    fn dispatch(&mut self, method: &str, params: &JsonValue, id: JsonValue) -> RpcResponse {
        let result = match method {
            "load" => self.handle_load(params),
            "paint" => self.handle_paint(params),
            "run_frames" => self.handle_run_frames(params),
            "save_state" => self.handle_save_state(),
            "load_state" => self.handle_load_state(params),
            "compute_scale" => self.handle_compute_scale(),
            "av_state" => self.handle_av_state(),
            "core_info" => Ok(handle_core_info()),
            "query" => self.handle_query(params),
            "screenshot" => self.handle_screenshot(params),
            _ => Err((METHOD_NOT_FOUND, format!("Unknown method: {method}"))),
        };
        match result {
            Ok(value) => RpcResponse::success(id, value),
            Err((code, message)) => RpcResponse::error(id, code, message),
        }
    }

    fn call(&mut self, operation: Operation, params: &mut Params<'_, ScriptHost>) -> Result<(), (i32, String)> {
        self.plugin
            .dispatch(operation.code(), params)
            .map_err(|e: CoreError| (CORE_ERROR, e.to_string()))
    }

    fn emulate_once(&mut self) -> Result<u32, (i32, String)> {
        let mut params = Params::Emulate { points: None };
        self.call(Operation::Emulate, &mut params)?;
        match params {
            Params::Emulate { points } => Ok(points.unwrap_or(0)),
            _ => Ok(0),
        }
    }

    // === Tool handlers ===

    fn handle_load(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let mut settings = Vec::new();
        for name in ["width", "height"] {
            match params.get(name) {
                None | Some(JsonValue::Null) => {}
                Some(JsonValue::String(s)) => settings.push(Setting::new(name, s.as_str())),
                Some(JsonValue::Number(n)) => settings.push(Setting::new(name, n.to_string())),
                Some(other) => {
                    return Err((INVALID_PARAMS, format!("'{name}' must be a number, got {other}")));
                }
            }
        }
        let mut load = Params::LoadRom {
            image: &[0],
            settings: &settings,
        };
        self.call(Operation::LoadRom, &mut load)?;
        let canvas = self.plugin.core().canvas();
        Ok(serde_json::json!({
            "status": "ok",
            "width": canvas.width(),
            "height": canvas.height(),
        }))
    }

    fn handle_paint(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let points = params.get("points").cloned().unwrap_or(JsonValue::Array(Vec::new()));
        let points: Vec<PaintPoint> = serde_json::from_value(points)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid points: {e}")))?;
        let host = self
            .plugin
            .host_mut()
            .ok_or((CORE_ERROR, "No host registered".to_string()))?;
        host.push_frame(points);
        let painted = self.emulate_once()?;
        Ok(serde_json::json!({
            "points": painted,
            "frame_count": self.plugin.core().frame_count(),
        }))
    }

    fn handle_run_frames(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let count = params.get("count").and_then(JsonValue::as_u64).unwrap_or(1);
        let mut total = 0u64;
        for _ in 0..count {
            total += u64::from(self.emulate_once()?);
        }
        Ok(serde_json::json!({
            "frames": count,
            "points": total,
            "frame_count": self.plugin.core().frame_count(),
        }))
    }

    fn handle_save_state(&mut self) -> Result<JsonValue, (i32, String)> {
        let mut params = Params::SaveState { data: Vec::new() };
        self.call(Operation::SaveState, &mut params)?;
        let Params::SaveState { data } = params else {
            return Err((CORE_ERROR, "save state not produced".to_string()));
        };
        Ok(serde_json::json!({
            "size": data.len(),
            "data": base64::engine::general_purpose::STANDARD.encode(&data),
        }))
    }

    fn handle_load_state(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let b64 = params
            .get("data")
            .and_then(JsonValue::as_str)
            .ok_or((INVALID_PARAMS, "Missing 'data' parameter".to_string()))?;
        let data = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid base64: {e}")))?;
        self.call(Operation::LoadState, &mut Params::LoadState { data: &data })?;
        Ok(serde_json::json!({"status": "ok"}))
    }

    fn handle_compute_scale(&mut self) -> Result<JsonValue, (i32, String)> {
        let mut params = Params::ComputeScale { out: None };
        self.call(Operation::ComputeScale, &mut params)?;
        match params {
            Params::ComputeScale { out: Some(scale) } => Ok(serde_json::json!({
                "horizontal": scale.horizontal,
                "vertical": scale.vertical,
            })),
            _ => Err((CORE_ERROR, "scale not produced".to_string())),
        }
    }

    fn handle_av_state(&mut self) -> Result<JsonValue, (i32, String)> {
        let mut params = Params::AvState { out: None };
        self.call(Operation::AvState, &mut params)?;
        match params {
            Params::AvState { out: Some(av) } => Ok(serde_json::json!({
                "fps": av.fps.to_string(),
                "par": av.par,
                "sample_rate": av.sample_rate.to_string(),
                "lightgun_width": av.lightgun_width,
                "lightgun_height": av.lightgun_height,
            })),
            _ => Err((CORE_ERROR, "av state not produced".to_string())),
        }
    }

    fn handle_query(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let core = self.plugin.core();
        let Some(path) = params.get("path").and_then(JsonValue::as_str) else {
            return Ok(serde_json::json!({ "paths": core.query_paths() }));
        };
        match core.query(path) {
            Some(value) => Ok(serde_json::json!({
                "path": path,
                "value": value.to_string(),
            })),
            None => Err((INVALID_PARAMS, format!("Unknown query path: {path}"))),
        }
    }

    fn handle_screenshot(&mut self, params: &JsonValue) -> Result<JsonValue, (i32, String)> {
        let scaled = params.get("scaled").and_then(JsonValue::as_bool).unwrap_or(false);
        let core = self.plugin.core();
        let scale = if scaled { core.compute_scale() } else { UNSCALED };
        let png = capture::encode_png(core.canvas(), scale)
            .map_err(|e| (CORE_ERROR, e.to_string()))?;
        Ok(serde_json::json!({
            "format": "png",
            "width": u32::from(core.canvas().width()) * scale.horizontal,
            "height": u32::from(core.canvas().height()) * scale.vertical,
            "data": base64::engine::general_purpose::STANDARD.encode(&png),
        }))
    }
}

fn handle_core_info() -> JsonValue {
    serde_json::json!({
        "core": info::core_info(),
        "type": info::type_info(),
        "region": info::region_info(),
        "sysregion": info::sysregion_info(),
        "controllers": info::controller_config(),
    })
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(None)
    }
}
