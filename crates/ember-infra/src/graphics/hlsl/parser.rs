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

//! Declaration-level HLSL parser.
//!
//! Only the global scope is parsed in full: constant buffers, structs, resource and uniform
//! declarations, and function signatures. Function bodies are kept as the set of identifiers
//! they mention, which is all reachability needs.

use super::lexer::{Token, TokenKind};
use std::collections::{HashMap, HashSet};

/// A parse failure with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// An explicit `register(...)` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    pub class: char,
    pub index: u32,
    pub line: u32,
}

/// A global whose type is a resource object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDecl {
    pub name: String,
    /// The HLSL type name without template arguments.
    pub type_name: String,
    pub count: u32,
    pub register: Option<Register>,
    pub line: u32,
}

/// A `cbuffer` or `tbuffer` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferBlock {
    pub name: String,
    pub is_texture_buffer: bool,
    pub members: Vec<String>,
    pub register: Option<Register>,
    pub line: u32,
}

/// A struct member or function parameter with an optional semantic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub type_name: String,
    pub name: String,
    pub semantic: Option<String>,
    pub is_output: bool,
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Field>,
    pub attributes: Vec<String>,
    /// Every identifier mentioned in the body.
    pub mentions: HashSet<String>,
    pub line: u32,
}

/// The global scope of a translation unit.
#[derive(Debug, Default)]
pub struct Program {
    pub buffers: Vec<BufferBlock>,
    pub resources: Vec<ResourceDecl>,
    /// Non-static, non-resource globals, which land in `$Globals`.
    pub uniforms: Vec<String>,
    pub structs: HashMap<String, Vec<Field>>,
    pub functions: Vec<Function>,
}

/// Resource object type names a global declaration may use.
pub const RESOURCE_TYPES: &[&str] = &[
    "Buffer",
    "ByteAddressBuffer",
    "StructuredBuffer",
    "Texture1D",
    "Texture1DArray",
    "Texture2D",
    "Texture2DArray",
    "Texture2DMS",
    "Texture2DMSArray",
    "Texture3D",
    "TextureCube",
    "TextureCubeArray",
    "RWBuffer",
    "RWByteAddressBuffer",
    "RWStructuredBuffer",
    "RWTexture1D",
    "RWTexture1DArray",
    "RWTexture2D",
    "RWTexture2DArray",
    "RWTexture3D",
    "AppendStructuredBuffer",
    "ConsumeStructuredBuffer",
    "SamplerState",
    "SamplerComparisonState",
    "sampler",
    "ConstantBuffer",
];

const STORAGE_MODIFIERS: &[&str] = &[
    "static",
    "const",
    "uniform",
    "extern",
    "groupshared",
    "inline",
    "precise",
    "volatile",
    "shared",
    "row_major",
    "column_major",
    "snorm",
    "unorm",
    "globallycoherent",
];

const PARAM_MODIFIERS: &[&str] = &[
    "in",
    "out",
    "inout",
    "uniform",
    "const",
    "nointerpolation",
    "linear",
    "centroid",
    "noperspective",
    "sample",
    "point",
    "line",
    "triangle",
    "lineadj",
    "triangleadj",
    "precise",
];

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof_line: u32,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn error_at(&self, token: Option<&Token>, message: impl Into<String>) -> ParseError {
        let (line, column) = token.map_or((self.eof_line, 1), |t| (t.line, t.column));
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn unexpected(&self, token: Option<&Token>) -> ParseError {
        match token {
            Some(t) => self.error_at(Some(t), format!("syntax error: unexpected token '{}'", t.text())),
            None => self.error_at(None, "syntax error: unexpected end of file"),
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<&'a Token, ParseError> {
        match self.next() {
            Some(t) if t.is_punct(c) => Ok(t),
            other => Err(self.unexpected(other)),
        }
    }

    fn expect_ident(&mut self) -> Result<(&'a str, &'a Token), ParseError> {
        match self.next() {
            Some(t) => match &t.kind {
                TokenKind::Ident(name) => Ok((name.as_str(), t)),
                _ => Err(self.unexpected(Some(t))),
            },
            None => Err(self.unexpected(None)),
        }
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|t| t.is_punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a balanced group starting at the current opening token and returns its
    /// inner tokens.
    fn group(&mut self, open: char, close: char) -> Result<&'a [Token], ParseError> {
        let start_token = self.expect_punct(open)?;
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(t) = self.next() {
            if t.is_punct(open) {
                depth += 1;
            } else if t.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(&self.tokens[start..self.pos - 1]);
                }
            }
        }
        Err(self.error_at(
            Some(start_token),
            format!("syntax error: '{open}' is never closed"),
        ))
    }

    /// Skips tokens up to and including the next `;` outside any bracket.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        let mut depth = 0i32;
        while let Some(t) = self.next() {
            match &t.kind {
                TokenKind::Punct('(' | '{' | '[') => depth += 1,
                TokenKind::Punct(')' | '}' | ']') => depth -= 1,
                TokenKind::Punct(';') if depth <= 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_at(None, "syntax error: missing ';'"))
    }

    /// Parses a type name, consuming any template argument list.
    fn type_name(&mut self) -> Result<String, ParseError> {
        let (name, _) = self.expect_ident()?;
        if self.peek().is_some_and(|t| t.is_punct('<')) {
            self.group('<', '>')?;
        }
        Ok(name.to_string())
    }

    fn register(&mut self) -> Result<Register, ParseError> {
        let inner = self.group('(', ')')?;
        let first = inner.first();
        let parsed = first.and_then(Token::ident).and_then(|reg| {
            let mut chars = reg.chars();
            let class = chars.next()?.to_ascii_lowercase();
            let index = chars.as_str().parse().ok()?;
            Some((class, index))
        });
        match (parsed, first) {
            (Some((class, index)), Some(t)) => Ok(Register {
                class,
                index,
                line: t.line,
            }),
            _ => Err(self.error_at(first, "invalid register specification")),
        }
    }

    /// Parses the annotations after a declarator: `: register(..)`, `: packoffset(..)` or a
    /// semantic, in any number.
    fn annotations(&mut self) -> Result<(Option<Register>, Option<String>), ParseError> {
        let mut register = None;
        let mut semantic = None;
        while self.eat_punct(':') {
            let (name, _) = self.expect_ident()?;
            match name {
                "register" => register = Some(self.register()?),
                "packoffset" => {
                    self.group('(', ')')?;
                }
                _ => semantic = Some(name.to_string()),
            }
        }
        Ok((register, semantic))
    }

    fn array_size(&mut self) -> Result<Option<u32>, ParseError> {
        if !self.peek().is_some_and(|t| t.is_punct('[')) {
            return Ok(None);
        }
        let open = self.peek();
        let inner = self.group('[', ']')?;
        match inner {
            [Token {
                kind: TokenKind::Number(n),
                ..
            }] => n
                .trim_end_matches(['u', 'U'])
                .parse()
                .map(Some)
                .map_err(|_| self.error_at(open, format!("invalid array size '{n}'"))),
            [] => Err(self.error_at(open, "unbounded resource arrays are not supported")),
            _ => Err(self.error_at(open, "array size must be an integer literal")),
        }
    }

    fn buffer_block(&mut self, is_texture_buffer: bool) -> Result<BufferBlock, ParseError> {
        let (name, token) = self.expect_ident()?;
        let (register, _) = self.annotations()?;
        let body = self.group('{', '}')?;
        self.eat_punct(';');
        Ok(BufferBlock {
            name: name.to_string(),
            is_texture_buffer,
            members: member_names(body),
            register,
            line: token.line,
        })
    }

    fn struct_def(&mut self) -> Result<(String, Vec<Field>), ParseError> {
        let (name, _) = self.expect_ident()?;
        let body = self.group('{', '}')?;
        let mut fields = Vec::new();
        for decl in split_top_level(body, ';') {
            if let Some(field) = field_from_tokens(decl) {
                fields.push(field);
            }
        }
        // Trailing declarators (`struct S { .. } s;`) declare nothing the reflection cares about.
        self.skip_statement()?;
        Ok((name.to_string(), fields))
    }

    fn skip_attribute(&mut self, attributes: &mut Vec<String>) -> Result<(), ParseError> {
        let inner = self.group('[', ']')?;
        if let Some(name) = inner.first().and_then(Token::ident) {
            attributes.push(name.to_string());
        }
        Ok(())
    }

    fn declaration(&mut self, program: &mut Program, attributes: Vec<String>) -> Result<(), ParseError> {
        let mut is_static = false;
        while let Some(modifier) = self.peek().and_then(Token::ident) {
            if !STORAGE_MODIFIERS.contains(&modifier) {
                break;
            }
            is_static |= matches!(modifier, "static" | "groupshared");
            self.pos += 1;
        }

        let type_token = self.peek();
        let type_name = self.type_name()?;
        let (name, name_token) = self.expect_ident()?;

        if self.peek().is_some_and(|t| t.is_punct('(')) {
            let params = self.group('(', ')')?;
            self.annotations()?;
            let params = split_top_level(params, ',')
                .into_iter()
                .filter(|p| !p.is_empty() && !(p.len() == 1 && p[0].is_ident("void")))
                .map(|p| {
                    parameter_from_tokens(p).ok_or_else(|| {
                        self.error_at(p.first(), "syntax error: malformed parameter")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if self.eat_punct(';') {
                return Ok(());
            }
            let body = self.group('{', '}')?;
            program.functions.push(Function {
                name: name.to_string(),
                params,
                attributes,
                mentions: body.iter().filter_map(Token::ident).map(str::to_string).collect(),
                line: name_token.line,
            });
            return Ok(());
        }

        let is_resource = RESOURCE_TYPES.contains(&type_name.as_str());
        let mut declarator = Some((name, name_token));
        while let Some((name, token)) = declarator.take() {
            let count = self.array_size()?;
            let (register, _) = self.annotations()?;
            if self.peek().is_some_and(|t| t.is_punct('{')) {
                // Effect-style sampler state blocks.
                self.group('{', '}')?;
            }
            if self.eat_punct('=') {
                self.skip_initializer()?;
            }
            if is_resource {
                program.resources.push(ResourceDecl {
                    name: name.to_string(),
                    type_name: type_name.clone(),
                    count: count.unwrap_or(1),
                    register,
                    line: token.line,
                });
            } else if !is_static {
                if register.is_some() {
                    return Err(self.error_at(
                        type_token,
                        format!("'{name}' is not a resource and cannot take a register"),
                    ));
                }
                program.uniforms.push(name.to_string());
            }
            if self.eat_punct(',') {
                let (next, next_token) = self.expect_ident()?;
                declarator = Some((next, next_token));
            }
        }
        self.expect_punct(';')?;
        Ok(())
    }

    /// Skips an initializer up to the `,` or `;` that ends it.
    fn skip_initializer(&mut self) -> Result<(), ParseError> {
        let mut depth = 0i32;
        while let Some(t) = self.peek() {
            match &t.kind {
                TokenKind::Punct('(' | '{' | '[') => depth += 1,
                TokenKind::Punct(')' | '}' | ']') => depth -= 1,
                TokenKind::Punct(',' | ';') if depth == 0 => return Ok(()),
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error_at(None, "syntax error: missing ';'"))
    }
}

/// Splits tokens on `separator` at bracket depth zero.
fn split_top_level(tokens: &[Token], separator: char) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        match &t.kind {
            TokenKind::Punct('(' | '{' | '[' | '<') => depth += 1,
            TokenKind::Punct(')' | '}' | ']' | '>') => depth -= 1,
            TokenKind::Punct(c) if *c == separator && depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

/// The declared names of a constant buffer body.
fn member_names(body: &[Token]) -> Vec<String> {
    split_top_level(body, ';')
        .into_iter()
        .filter_map(|decl| {
            let end = decl
                .iter()
                .position(|t| t.is_punct(':') || t.is_punct('[') || t.is_punct('='))
                .unwrap_or(decl.len());
            decl[..end].iter().rev().find_map(Token::ident).map(str::to_string)
        })
        .collect()
}

/// Reads `[modifiers] type name [array] [: SEMANTIC]` from one declaration.
fn field_from_tokens(tokens: &[Token]) -> Option<Field> {
    let mut is_output = false;
    let mut rest = tokens;
    while let Some(modifier) = rest.first().and_then(Token::ident) {
        if !PARAM_MODIFIERS.contains(&modifier) && !STORAGE_MODIFIERS.contains(&modifier) {
            break;
        }
        is_output |= matches!(modifier, "out" | "inout");
        rest = &rest[1..];
    }

    let type_name = rest.first()?.ident()?.to_string();
    rest = &rest[1..];
    if rest.first().is_some_and(|t| t.is_punct('<')) {
        let mut depth = 0i32;
        let close = rest.iter().position(|t| {
            if t.is_punct('<') {
                depth += 1;
            } else if t.is_punct('>') {
                depth -= 1;
            }
            depth == 0
        })?;
        rest = &rest[close + 1..];
    }

    let name = rest.first()?.ident()?.to_string();
    let colon = rest.iter().position(|t| t.is_punct(':'));
    let semantic = colon
        .and_then(|i| rest.get(i + 1))
        .and_then(Token::ident)
        .map(str::to_string);
    Some(Field {
        type_name,
        name,
        semantic,
        is_output,
    })
}

fn parameter_from_tokens(tokens: &[Token]) -> Option<Field> {
    // Default values are irrelevant to the signature.
    let end = tokens.iter().position(|t| t.is_punct('=')).unwrap_or(tokens.len());
    field_from_tokens(&tokens[..end])
}

/// Parses the global scope of a token stream.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof_line: tokens.last().map_or(1, |t| t.line),
    };
    let mut program = Program::default();
    let mut attributes = Vec::new();

    while let Some(token) = parser.peek() {
        match &token.kind {
            TokenKind::Punct(';') => {
                parser.pos += 1;
            }
            TokenKind::Punct('[') => parser.skip_attribute(&mut attributes)?,
            TokenKind::Ident(word) => match word.as_str() {
                "cbuffer" | "tbuffer" => {
                    parser.pos += 1;
                    let block = parser.buffer_block(word == "tbuffer")?;
                    program.buffers.push(block);
                }
                "struct" if parser.peek_at(2).is_some_and(|t| t.is_punct('{')) => {
                    parser.pos += 1;
                    let (name, fields) = parser.struct_def()?;
                    program.structs.insert(name, fields);
                }
                "typedef" => parser.skip_statement()?,
                _ => parser.declaration(&mut program, std::mem::take(&mut attributes))?,
            },
            _ => return Err(parser.unexpected(Some(token))),
        }
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn program(source: &str) -> Program {
        parse(&tokenize(source).unwrap()).unwrap()
    }

    #[test]
    fn parses_buffers_resources_and_functions() {
        let p = program(
            r#"
            cbuffer PerFrame : register(b1) { row_major float4x4 viewProj; float4 tint[2]; };
            Texture2D<float4> albedo : register(t0);
            Texture2D shadows[4];
            SamplerState linearSampler, pointSampler;
            static const float PI = 3.14159;
            float time;
            struct VSIn { float3 pos : POSITION; float2 uv : TEXCOORD0; };
            float4 main(VSIn input) : SV_Position { return mul(float4(input.pos, 1), viewProj); }
            "#,
        );
        assert_eq!(p.buffers.len(), 1);
        assert_eq!(p.buffers[0].members, vec!["viewProj", "tint"]);
        assert_eq!(p.buffers[0].register.map(|r| (r.class, r.index)), Some(('b', 1)));

        let names: Vec<_> = p.resources.iter().map(|r| (r.name.as_str(), r.count)).collect();
        assert_eq!(
            names,
            vec![("albedo", 1), ("shadows", 4), ("linearSampler", 1), ("pointSampler", 1)]
        );
        assert_eq!(p.uniforms, vec!["time"]);
        assert_eq!(p.structs["VSIn"][1].semantic.as_deref(), Some("TEXCOORD0"));

        let main = &p.functions[0];
        assert_eq!(main.params[0].type_name, "VSIn");
        assert!(main.mentions.contains("viewProj"));
    }

    #[test]
    fn attributes_attach_to_the_next_function() {
        let p = program("[numthreads(8, 8, 1)] void main(uint3 id : SV_DispatchThreadID) {}");
        assert_eq!(p.functions[0].attributes, vec!["numthreads"]);
        assert_eq!(p.functions[0].params[0].semantic.as_deref(), Some("SV_DispatchThreadID"));
    }

    #[test]
    fn unbalanced_braces_report_the_opening_line() {
        let err = parse(&tokenize("float4 main() : SV_Target\n{\n return 0;").unwrap()).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("never closed"));
    }

    #[test]
    fn stray_tokens_are_syntax_errors() {
        let err = parse(&tokenize("float x;\n}").unwrap()).unwrap_err();
        assert_eq!((err.line, err.column), (2, 1));
        assert_eq!(err.message, "syntax error: unexpected token '}'");
    }
}
