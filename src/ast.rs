use std::collections::BTreeMap;

/// The set of block kinds the compiler knows how to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    LogicBoolean,  // logic_boolean
    MathNumber,    // math_number
    MathConstant,  // math_constant
    Text,          // text
    VariablesGet,  // variables_get
    LogicNegate,   // logic_negate
    VariablesSet,  // variables_set
    TextPrint,     // text_print
    /// Any other `type` attribute. Translating it is an error.
    Unrecognized(String),
}

impl BlockKind {
    pub fn from_type(name: &str) -> Self {
        match name {
            "logic_boolean" => BlockKind::LogicBoolean,
            "math_number" => BlockKind::MathNumber,
            "math_constant" => BlockKind::MathConstant,
            "text" => BlockKind::Text,
            "variables_get" => BlockKind::VariablesGet,
            "logic_negate" => BlockKind::LogicNegate,
            "variables_set" => BlockKind::VariablesSet,
            "text_print" => BlockKind::TextPrint,
            other => BlockKind::Unrecognized(other.to_string()),
        }
    }

    /// The Blockly type name this kind was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::LogicBoolean => "logic_boolean",
            BlockKind::MathNumber => "math_number",
            BlockKind::MathConstant => "math_constant",
            BlockKind::Text => "text",
            BlockKind::VariablesGet => "variables_get",
            BlockKind::LogicNegate => "logic_negate",
            BlockKind::VariablesSet => "variables_set",
            BlockKind::TextPrint => "text_print",
            BlockKind::Unrecognized(name) => name,
        }
    }
}

/// A named field on a block. Variable fields carry the declared id as
/// `reference`, the text is only the human-readable name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    pub text: String,
    pub reference: Option<String>,
}

/// A `<value>` slot: the explicit child block and the shadow default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Input {
    pub block: Option<Box<Block>>,
    pub shadow: Option<Box<Block>>,
}

/// One node of the parsed block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub id: Option<String>,
    pub(crate) fields: BTreeMap<String, Field>,
    pub(crate) values: BTreeMap<String, Input>,
    pub(crate) statements: BTreeMap<String, Block>,
    pub(crate) next: Option<Box<Block>>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            id: None,
            fields: BTreeMap::new(),
            values: BTreeMap::new(),
            statements: BTreeMap::new(),
            next: None,
        }
    }

    /// Text of the named field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.text.as_str())
    }

    /// The `id` attribute of the named field (a variable reference).
    pub fn field_reference(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|field| field.reference.as_deref())
    }

    /// The explicit child block plugged into a value slot.
    pub fn child_value(&self, slot: &str) -> Option<&Block> {
        self.values.get(slot).and_then(|input| input.block.as_deref())
    }

    /// The shadow default of a value slot.
    pub fn shadow_value(&self, slot: &str) -> Option<&Block> {
        self.values.get(slot).and_then(|input| input.shadow.as_deref())
    }

    /// Nested statement chain. No current block kind reads these.
    pub fn statement(&self, name: &str) -> Option<&Block> {
        self.statements.get(name)
    }

    pub fn next(&self) -> Option<&Block> {
        self.next.as_deref()
    }

    /// Iterates this block and every block reachable through `next`, in
    /// program order.
    pub fn chain(&self) -> impl Iterator<Item = &Block> {
        std::iter::successors(Some(self), |block| block.next())
    }

    pub fn with_field(mut self, name: &str, text: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            Field {
                text: text.to_string(),
                reference: None,
            },
        );
        self
    }

    pub fn with_variable_field(mut self, name: &str, id: &str, text: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            Field {
                text: text.to_string(),
                reference: Some(id.to_string()),
            },
        );
        self
    }

    pub fn with_value(mut self, slot: &str, block: Block) -> Self {
        self.values.entry(slot.to_string()).or_default().block = Some(Box::new(block));
        self
    }

    pub fn with_shadow(mut self, slot: &str, block: Block) -> Self {
        self.values.entry(slot.to_string()).or_default().shadow = Some(Box::new(block));
        self
    }

    pub fn with_next(mut self, block: Block) -> Self {
        self.next = Some(Box::new(block));
        self
    }
}

/// A globally declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: String,
    pub name: String,
}

/// The parsed program: declared variables plus the root statement chains.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) blocks: Vec<Block>,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>, blocks: Vec<Block>) -> Self {
        Self {
            declarations,
            blocks,
        }
    }

    /// Declared variables, in document order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Root-level statement chains, in document order.
    pub fn top_level_blocks(&self) -> &[Block] {
        &self.blocks
    }
}
