/*
 * String Primitive Registry
 *
 * Maps (declaring type, method name, parameter types) to the semantic tag
 * the interpreter applies. Return types are not part of the key.
 *
 * Defaults:
 *   java.lang.StringBuilder / java.lang.StringBuffer
 *     append(java.lang.String)   APPEND
 *     toString()                 TO_STRING
 *     <init>()                   INIT_EMPTY
 *     <init>(java.lang.String)   INIT_WITH_TEXT
 *   java.lang.String
 *     concat(java.lang.String)   CONCAT
 */

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::features::ir::domain::MethodSignature;

pub const STRING: &str = "java.lang.String";
pub const STRING_BUILDER: &str = "java.lang.StringBuilder";
pub const STRING_BUFFER: &str = "java.lang.StringBuffer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringPrimitive {
    Append,
    Concat,
    ToString,
    InitEmpty,
    InitWithText,
}

impl StringPrimitive {
    pub fn is_constructor(self) -> bool {
        matches!(self, StringPrimitive::InitEmpty | StringPrimitive::InitWithText)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PrimitiveKey {
    declaring_class: String,
    name: String,
    params: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PrimitiveRegistry {
    entries: FxHashMap<PrimitiveKey, StringPrimitive>,

    /// Declaring types of registered constructors
    builder_types: FxHashSet<String>,
}

impl PrimitiveRegistry {
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
            builder_types: FxHashSet::default(),
        }
    }

    /// StringBuilder, StringBuffer and String.concat
    pub fn java_lang() -> Self {
        let mut registry = Self::empty();
        for builder in [STRING_BUILDER, STRING_BUFFER] {
            registry.register(builder, "append", &[STRING], StringPrimitive::Append);
            registry.register::<&str>(builder, "toString", &[], StringPrimitive::ToString);
            registry.register::<&str>(builder, "<init>", &[], StringPrimitive::InitEmpty);
            registry.register(builder, "<init>", &[STRING], StringPrimitive::InitWithText);
        }
        registry.register(STRING, "concat", &[STRING], StringPrimitive::Concat);
        registry
    }

    pub fn register<S: AsRef<str>>(
        &mut self,
        declaring_class: &str,
        name: &str,
        params: &[S],
        tag: StringPrimitive,
    ) {
        if tag.is_constructor() {
            self.builder_types.insert(declaring_class.to_string());
        }
        let key = PrimitiveKey {
            declaring_class: declaring_class.to_string(),
            name: name.to_string(),
            params: params.iter().map(|p| p.as_ref().to_string()).collect(),
        };
        self.entries.insert(key, tag);
    }

    pub fn lookup(&self, method: &MethodSignature) -> Option<StringPrimitive> {
        let key = PrimitiveKey {
            declaring_class: method.declaring_class.clone(),
            name: method.name.clone(),
            params: method.params.clone(),
        };
        self.entries.get(&key).copied()
    }

    /// Whether `new T` of this type is a string builder allocation
    pub fn is_builder_type(&self, ty: &str) -> bool {
        self.builder_types.contains(ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::java_lang()
    }
}

/// Signatures of the default primitives
pub mod signatures {
    use super::{STRING, STRING_BUILDER};
    use crate::features::ir::domain::MethodSignature;

    pub fn builder_init() -> MethodSignature {
        MethodSignature::new(STRING_BUILDER, "<init>", &[], "void")
    }

    pub fn builder_init_with_text() -> MethodSignature {
        MethodSignature::new(STRING_BUILDER, "<init>", &[STRING], "void")
    }

    pub fn builder_append() -> MethodSignature {
        MethodSignature::new(STRING_BUILDER, "append", &[STRING], STRING_BUILDER)
    }

    pub fn builder_to_string() -> MethodSignature {
        MethodSignature::new(STRING_BUILDER, "toString", &[], STRING)
    }

    pub fn string_concat() -> MethodSignature {
        MethodSignature::new(STRING, "concat", &[STRING], STRING)
    }
}
