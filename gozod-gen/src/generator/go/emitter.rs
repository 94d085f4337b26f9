//! Go schema emitter.
//!
//! Renders each record as a `Schema()` method returning a struct schema
//! whose entries are built by chained calls, one call per rule, in tag
//! order:
//!
//! ```text
//! "age": schema.Int().Min(18).Max(120),
//! ```

use gozod::{Rule, RuleKind};
use tracing::{debug, trace};

use super::format::{self, Import};
use super::literal::{self, go_quote};
use super::type_mapper::{self, TypeMapper};
use crate::error::{EmissionError, Result};
use crate::generator::traits::{CodeGenerator, GeneratedCode, GeneratorConfig, GENERATED_MARKER};
use crate::ir::{FieldDescriptor, PrimitiveKind, RecordDescriptor, SemanticType};

/// Alias the generated file gives Go's `regexp` package.
const REGEX_ALIAS: &str = "regex";

/// Emits Go source for gozod schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoEmitter;

impl GoEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the schema expression of one field.
    pub fn render_field(
        &self,
        record: &RecordDescriptor,
        field: &FieldDescriptor,
        config: &GeneratorConfig,
    ) -> std::result::Result<String, EmissionError> {
        let a = config.schema_alias.as_str();
        let kinds = field
            .rules
            .iter()
            .map(|rule| {
                RuleKind::from_name(&rule.name).ok_or_else(|| EmissionError::UnknownRule {
                    rule: rule.name.clone(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let leaf = type_mapper::leaf(&field.semantic_type);
        let mut uuid_base = false;
        let leaf_override = if let Some(rule) = field
            .rules
            .iter()
            .zip(&kinds)
            .find_map(|(rule, kind)| (*kind == RuleKind::Enum).then_some(rule))
        {
            let values = literal::enum_literals(rule, leaf)?;
            Some(format!("{a}.Enum({})", values.join(", ")))
        } else if kinds.contains(&RuleKind::Time) {
            Some(format!("{a}.Time()"))
        } else if kinds.contains(&RuleKind::Uuid)
            && *leaf == SemanticType::Primitive(PrimitiveKind::String)
        {
            uuid_base = true;
            Some(format!("{a}.UUID()"))
        } else {
            None
        };

        // Qualifier families exist only on the matching schema types.
        let string_base = *field.semantic_type.pointee()
            == SemanticType::Primitive(PrimitiveKind::String)
            && (leaf_override.is_none() || uuid_base);
        let numeric_base = field.semantic_type.primitive().is_some_and(PrimitiveKind::is_numeric);
        let sized_base = string_base
            || matches!(
                field.semantic_type.pointee(),
                SemanticType::Slice(_) | SemanticType::Map { .. }
            );

        let mapper = TypeMapper::new(a, record);
        let mut expr = mapper.base(field, leaf_override.as_deref());
        let mut nilable = false;

        for (rule, kind) in field.rules.iter().zip(kinds) {
            let call = match kind {
                RuleKind::Required | RuleKind::Enum | RuleKind::Time => None,
                RuleKind::Uuid if uuid_base => None,
                RuleKind::Nilable => {
                    nilable = true;
                    Some(call(kind, ""))
                }
                RuleKind::Min | RuleKind::Max => {
                    Some(call(kind, &bound_or_size(rule, field, string_base)?))
                }
                RuleKind::Length | RuleKind::Size => {
                    applicable(sized_base, rule, field)?;
                    Some(call(kind, &size(rule)?))
                }
                RuleKind::Gt
                | RuleKind::Gte
                | RuleKind::Lt
                | RuleKind::Lte
                | RuleKind::MultipleOf => Some(call(kind, &numeric_bound(rule, field)?)),
                RuleKind::Includes | RuleKind::StartsWith | RuleKind::EndsWith => {
                    applicable(string_base, rule, field)?;
                    Some(call(kind, &go_quote(&rule.joined_params())))
                }
                RuleKind::Regex => {
                    applicable(string_base, rule, field)?;
                    Some(call(kind, &compiled_regex(rule)?))
                }
                RuleKind::Default | RuleKind::Prefault => {
                    Some(call(kind, &literal::value_literal(rule, field)?))
                }
                RuleKind::Refine | RuleKind::Check => Some(call(kind, &identifier(rule)?)),
                RuleKind::Positive
                | RuleKind::Negative
                | RuleKind::NonPositive
                | RuleKind::NonNegative => {
                    applicable(numeric_base, rule, field)?;
                    Some(call(kind, ""))
                }
                RuleKind::Trim
                | RuleKind::Lowercase
                | RuleKind::Uppercase
                | RuleKind::Email
                | RuleKind::Url
                | RuleKind::Hostname
                | RuleKind::Uuid
                | RuleKind::Guid
                | RuleKind::Cuid
                | RuleKind::Cuid2
                | RuleKind::NanoId
                | RuleKind::Ulid
                | RuleKind::Xid
                | RuleKind::Ksuid
                | RuleKind::Ipv4
                | RuleKind::Ipv6
                | RuleKind::CidrV4
                | RuleKind::CidrV6
                | RuleKind::Base64
                | RuleKind::Base64Url
                | RuleKind::Hex
                | RuleKind::Md5Hex
                | RuleKind::Sha1Hex
                | RuleKind::Sha256Hex
                | RuleKind::Sha384Hex
                | RuleKind::Sha512Hex
                | RuleKind::E164
                | RuleKind::Emoji => {
                    applicable(string_base, rule, field)?;
                    Some(call(kind, ""))
                }
            };
            if let Some(call) = call {
                trace!(field = %field.name, rule = %rule, call = %call, "rendered rule");
                expr.push_str(&call);
            }
        }

        if field.optional && !nilable {
            expr.push_str(".Optional()");
        }
        Ok(expr)
    }
}

impl CodeGenerator for GoEmitter {
    fn id(&self) -> &'static str {
        "go"
    }

    fn file_extension(&self) -> &'static str {
        "go"
    }

    fn generate_record(&self, record: &RecordDescriptor, config: &GeneratorConfig) -> Result<String> {
        let a = config.schema_alias.as_str();
        let ty = record.type_name();

        let mut entries = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let expr = self
                .render_field(record, field, config)
                .map_err(|e| e.at(&record.source_file, &record.name, &field.name))?;
            entries.push((go_quote(&field.json_key), expr));
        }

        let body = if entries.is_empty() {
            format!("{a}.StructSchema{{}}")
        } else {
            let mut body = format!("{a}.StructSchema{{\n");
            for line in format::align_entries(&entries) {
                body.push_str("\t\t");
                body.push_str(&line);
                body.push('\n');
            }
            body.push_str("\t}");
            body
        };

        let mut receiver = format::receiver_name(&record.name);
        if [a, REGEX_ALIAS, "time"].contains(&receiver.as_str()) {
            receiver = "x".to_string();
        }

        debug!(record = %record.name, fields = entries.len(), "emitted record");
        Ok(format!(
            "// Schema returns the gozod schema for {name}.\n\
             func ({receiver} {ty}) Schema() *{a}.ZodStruct[{ty}, {ty}] {{\n\
             \treturn {a}.Struct[{ty}]({body})\n\
             }}\n",
            name = record.name,
        ))
    }

    fn generate_file(
        &self,
        records: &[RecordDescriptor],
        config: &GeneratorConfig,
    ) -> Result<GeneratedCode> {
        let bodies = records
            .iter()
            .map(|record| self.generate_record(record, config))
            .collect::<Result<Vec<_>>>()?;

        let package = config
            .package_override
            .as_deref()
            .or_else(|| records.first().map(|r| r.package.as_str()))
            .unwrap_or("main");

        let fields = || records.iter().flat_map(|r| &r.fields);
        let uses_regex = fields().any(|f| f.has_rule(RuleKind::Regex));
        let uses_time = records.iter().any(RecordDescriptor::uses_time);
        let references_time = fields().any(|f| {
            *f.semantic_type.pointee() == SemanticType::Time
                && (f.has_rule(RuleKind::Default) || f.has_rule(RuleKind::Prefault))
        });

        let mut imports = vec![Import::aliased(&config.schema_package, &config.schema_alias)];
        if uses_regex {
            imports.push(Import::aliased("regexp", REGEX_ALIAS));
        }
        if uses_time {
            imports.push(Import::new("time"));
        }

        let mut code = String::new();
        code.push_str(GENERATED_MARKER);
        code.push_str("\n\n");
        if let Some(constraint) = config.build_constraint() {
            code.push_str(&constraint);
            code.push_str("\n\n");
        }
        code.push_str(&format!("package {package}\n\n"));
        code.push_str(&format::import_block(&imports));
        if uses_time && !references_time {
            code.push_str("\nvar _ time.Time\n");
        }
        for body in &bodies {
            code.push('\n');
            code.push_str(body);
        }

        Ok(GeneratedCode::new(code)
            .with_records(records.iter().map(|r| r.name.clone()).collect())
            .with_imports(imports.into_iter().map(|i| i.path).collect()))
    }
}

/// A qualifier call for a rule: `.Method(args)`.
fn call(kind: RuleKind, args: &str) -> String {
    format!(".{}({args})", kind.method().unwrap_or_default())
}

fn invalid(rule: &Rule, reason: impl Into<String>) -> EmissionError {
    EmissionError::InvalidParam {
        rule: rule.name.clone(),
        param: rule.joined_params(),
        reason: reason.into(),
    }
}

fn applicable(
    applies: bool,
    rule: &Rule,
    field: &FieldDescriptor,
) -> std::result::Result<(), EmissionError> {
    if applies {
        Ok(())
    } else {
        Err(EmissionError::InapplicableRule {
            rule: rule.name.clone(),
            type_expression: field.type_expression.clone(),
        })
    }
}

/// `min`/`max`: a value bound on numbers, a length bound otherwise.
fn bound_or_size(
    rule: &Rule,
    field: &FieldDescriptor,
    string_base: bool,
) -> std::result::Result<String, EmissionError> {
    match field.semantic_type.pointee() {
        SemanticType::Primitive(PrimitiveKind::String) => {
            applicable(string_base, rule, field)?;
            size(rule)
        }
        SemanticType::Slice(_) | SemanticType::Map { .. } => size(rule),
        SemanticType::Primitive(kind) => {
            literal::bound(*kind, &rule.joined_params()).map_err(|reason| invalid(rule, reason))
        }
        _ => Err(invalid(
            rule,
            format!("{} has no length or numeric bound", field.type_expression),
        )),
    }
}

fn numeric_bound(rule: &Rule, field: &FieldDescriptor) -> std::result::Result<String, EmissionError> {
    match field.semantic_type.primitive() {
        Some(kind) if kind.is_numeric() => {
            literal::bound(kind, &rule.joined_params()).map_err(|reason| invalid(rule, reason))
        }
        _ => Err(invalid(
            rule,
            format!("{} is not a numeric type", field.type_expression),
        )),
    }
}

fn size(rule: &Rule) -> std::result::Result<String, EmissionError> {
    literal::size(&rule.joined_params()).map_err(|reason| invalid(rule, reason))
}

fn compiled_regex(rule: &Rule) -> std::result::Result<String, EmissionError> {
    let pattern = rule.joined_params();
    regex::Regex::new(&pattern).map_err(|e| invalid(rule, e.to_string()))?;
    Ok(format!("{REGEX_ALIAS}.MustCompile({})", go_quote(&pattern)))
}

fn identifier(rule: &Rule) -> std::result::Result<String, EmissionError> {
    let ident = rule.joined_params();
    if format::is_identifier(&ident) {
        Ok(ident)
    } else {
        Err(invalid(rule, "expected a function name"))
    }
}
