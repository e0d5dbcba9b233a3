use linked_hash_map::LinkedHashMap;
use std::collections::HashMap;

/// key of the conventional default export slot of a loaded module object
pub const DEFAULT_EXPORT_KEY: &str = "default";

/// ordered mapping from module identifier to loaded value
/// keys appear in the order the identifiers were requested in
pub type ModuleMap = LinkedHashMap<String, ModuleValue>;

/// Send able facade for a value produced by a host module loader
/// host adapters build these on the worker thread, the facade hands them to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleValue {
    I32 { val: i32 },
    F64 { val: f64 },
    String { val: String },
    Boolean { val: bool },
    Object { val: HashMap<String, ModuleValue> },
    Array { val: Vec<ModuleValue> },
    Null,
    Undefined,
}

impl ModuleValue {
    pub fn new_str(val: &str) -> Self {
        ModuleValue::String {
            val: val.to_string(),
        }
    }

    pub fn new_string(val: String) -> Self {
        ModuleValue::String { val }
    }

    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, ModuleValue::Null | ModuleValue::Undefined)
    }

    /// true for an object exposing a default export slot with a defined value
    pub fn has_default_export(&self) -> bool {
        match self {
            ModuleValue::Object { val } => match val.get(DEFAULT_EXPORT_KEY) {
                Some(dflt) => !matches!(dflt, ModuleValue::Undefined),
                None => false,
            },
            _ => false,
        }
    }

    /// unwrap the default export slot when the module exposes one, the raw value otherwise
    pub fn unwrap_default_export(self) -> ModuleValue {
        match self {
            ModuleValue::Object { mut val } => match val.remove(DEFAULT_EXPORT_KEY) {
                Some(dflt) => {
                    if matches!(dflt, ModuleValue::Undefined) {
                        // an undefined slot does not count as a default export
                        val.insert(DEFAULT_EXPORT_KEY.to_string(), dflt);
                        ModuleValue::Object { val }
                    } else {
                        dflt
                    }
                }
                None => ModuleValue::Object { val },
            },
            other => other,
        }
    }

    /// convert to a serde_json Value, Undefined becomes Null
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ModuleValue::I32 { val } => serde_json::Value::from(*val),
            ModuleValue::F64 { val } => serde_json::Value::from(*val),
            ModuleValue::String { val } => serde_json::Value::from(val.as_str()),
            ModuleValue::Boolean { val } => serde_json::Value::from(*val),
            ModuleValue::Object { val } => {
                let mut map = serde_json::Map::new();
                for (k, v) in val {
                    map.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
            ModuleValue::Array { val } => {
                serde_json::Value::Array(val.iter().map(ModuleValue::to_json).collect())
            }
            ModuleValue::Null | ModuleValue::Undefined => serde_json::Value::Null,
        }
    }
}

impl From<serde_json::Value> for ModuleValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ModuleValue::Null,
            serde_json::Value::Bool(b) => ModuleValue::Boolean { val: b },
            serde_json::Value::Number(n) => {
                let as_i64 = n.as_i64();
                match as_i64 {
                    Some(i) if i >= i32::MIN as i64 && i <= i32::MAX as i64 => {
                        ModuleValue::I32 { val: i as i32 }
                    }
                    _ => ModuleValue::F64 {
                        val: n.as_f64().unwrap_or(f64::NAN),
                    },
                }
            }
            serde_json::Value::String(s) => ModuleValue::String { val: s },
            serde_json::Value::Array(arr) => ModuleValue::Array {
                val: arr.into_iter().map(ModuleValue::from).collect(),
            },
            serde_json::Value::Object(obj) => ModuleValue::Object {
                val: obj
                    .into_iter()
                    .map(|(k, v)| (k, ModuleValue::from(v)))
                    .collect(),
            },
        }
    }
}
