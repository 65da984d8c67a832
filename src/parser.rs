use crate::ast::{Block, BlockKind, Declaration, Field, Input, Program};
use thiserror::Error;
use xmltree::{Element, ParserConfig, XMLNode};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed block document: {0}")]
    Xml(#[from] xmltree::ParseError),
    #[error("Expected <xml> document root, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
}

/// Parses a Blockly XML document into the program model.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    // Field text is literal; `"   "` must survive as three spaces.
    let config = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true);
    let root = Element::parse_with_config(source.as_bytes(), config)?;
    if root.name != "xml" {
        return Err(ParseError::UnexpectedRoot(root.name));
    }

    let mut declarations = Vec::new();
    let mut blocks = Vec::new();
    for child in elements(&root) {
        match child.name.as_str() {
            "variables" => {
                for variable in elements(child).filter(|e| e.name == "variable") {
                    declarations.push(parse_declaration(variable)?);
                }
            }
            "block" => blocks.push(parse_block(child)?),
            _ => {}
        }
    }

    Ok(Program::new(declarations, blocks))
}

fn elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

fn attribute<'a>(element: &'a Element, attribute: &'static str) -> Result<&'a str, ParseError> {
    element
        .attributes
        .get(attribute)
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingAttribute {
            element: element.name.clone(),
            attribute,
        })
}

fn text_of(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.into_owned())
        .unwrap_or_default()
}

fn parse_declaration(element: &Element) -> Result<Declaration, ParseError> {
    Ok(Declaration {
        id: attribute(element, "id")?.to_string(),
        name: text_of(element),
    })
}

/// Parses a `<block>` or `<shadow>` element together with its `next` chain.
fn parse_block(element: &Element) -> Result<Block, ParseError> {
    let mut block = Block::new(BlockKind::from_type(attribute(element, "type")?));
    block.id = element.attributes.get("id").cloned();

    for child in elements(element) {
        match child.name.as_str() {
            "field" => {
                let name = attribute(child, "name")?;
                block.fields.insert(
                    name.to_string(),
                    Field {
                        text: text_of(child),
                        reference: child.attributes.get("id").cloned(),
                    },
                );
            }
            "value" => {
                let name = attribute(child, "name")?;
                let mut input = Input::default();
                for nested in elements(child) {
                    match nested.name.as_str() {
                        "block" => input.block = Some(Box::new(parse_block(nested)?)),
                        "shadow" => input.shadow = Some(Box::new(parse_block(nested)?)),
                        _ => {}
                    }
                }
                block.values.insert(name.to_string(), input);
            }
            "statement" => {
                let name = attribute(child, "name")?;
                if let Some(first) = first_block(child)? {
                    block.statements.insert(name.to_string(), first);
                }
            }
            "next" => block.next = first_block(child)?.map(Box::new),
            // mutation, comment, data
            _ => {}
        }
    }

    Ok(block)
}

fn first_block(element: &Element) -> Result<Option<Block>, ParseError> {
    elements(element)
        .find(|e| e.name == "block")
        .map(parse_block)
        .transpose()
}
