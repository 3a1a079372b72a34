//! The IR's type tags and their default values.

use minirustc_par::TypeName;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    I32,
    F64,
    Bool,
    Str,
    Void,
}

impl IrType {
    /// `i32/f64/bool/str/void -> i32/double/i1/i8*/void`.
    pub fn from_type_name(name: TypeName) -> Self {
        match name {
            TypeName::I32 => IrType::I32,
            TypeName::F64 => IrType::F64,
            TypeName::Bool => IrType::Bool,
            TypeName::Str => IrType::Str,
        }
    }

    /// `i32/i1 -> 0, double -> 0.0, i8* -> null`.
    pub fn default_value(self) -> &'static str {
        match self {
            IrType::I32 | IrType::Bool => "0",
            IrType::F64 => "0.0",
            IrType::Str => "null",
            IrType::Void => "",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, IrType::F64)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            IrType::I32 => "i32",
            IrType::F64 => "double",
            IrType::Bool => "i1",
            IrType::Str => "i8*",
            IrType::Void => "void",
        };
        write!(f, "{tag}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_match_spec_mapping() {
        assert_eq!(IrType::I32.to_string(), "i32");
        assert_eq!(IrType::F64.to_string(), "double");
        assert_eq!(IrType::Bool.to_string(), "i1");
        assert_eq!(IrType::Str.to_string(), "i8*");
        assert_eq!(IrType::Void.to_string(), "void");
    }

    #[test]
    fn default_values() {
        assert_eq!(IrType::I32.default_value(), "0");
        assert_eq!(IrType::Bool.default_value(), "0");
        assert_eq!(IrType::F64.default_value(), "0.0");
        assert_eq!(IrType::Str.default_value(), "null");
    }
}
