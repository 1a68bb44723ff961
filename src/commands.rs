use std::collections::HashMap;
use std::fmt::Write;
use std::sync::OnceLock;

/// Every command family the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Exit,
    Clear,
    New,
    Save,
    Wipe,
    DrawRect,
    DrawEllipse,
    DrawLine,
    DrawPolygon,
    Fill,
    FillRect,
    FillEllipse,
    FillPolygon,
    Backdrop,
}

impl CommandKind {
    /// `COMMANDS` is laid out in declaration order of this enum.
    pub fn descriptor(self) -> &'static CommandDescriptor {
        &COMMANDS[self as usize]
    }
}

/// One placeholder in a usage signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Named(&'static str),
    /// Any number of further arguments shaped like the ones around it.
    Repeat,
}

#[derive(Debug)]
pub struct CommandDescriptor {
    pub kind: CommandKind,
    pub name: &'static str,
    pub description: &'static str,
    /// The first alias is the primary spelling shown in usage lines.
    pub aliases: &'static [&'static str],
    pub signatures: &'static [&'static [Param]],
}

use Param::{Named as P, Repeat};

const RECT_STROKE: &[Param] = &[
    P("color"),
    P("lineWidth"),
    P("x"),
    P("y"),
    P("width"),
    P("height"),
];
const RECT_FILL: &[Param] = &[P("color"), P("x"), P("y"), P("width"), P("height")];

pub static COMMANDS: [CommandDescriptor; 15] = [
    CommandDescriptor {
        kind: CommandKind::Help,
        name: "Help",
        description: "Displays information about commands.",
        aliases: &["help", "hlp", "hp", "h"],
        signatures: &[&[], &[P("command")]],
    },
    CommandDescriptor {
        kind: CommandKind::Exit,
        name: "Exit",
        description: "Terminates the program.",
        aliases: &["exit", "ex", "x"],
        signatures: &[&[]],
    },
    CommandDescriptor {
        kind: CommandKind::Clear,
        name: "Clear",
        description: "Clears the console.",
        aliases: &["clear", "cl", "c"],
        signatures: &[&[]],
    },
    CommandDescriptor {
        kind: CommandKind::New,
        name: "New",
        description: "Initializes a new bitmap.",
        aliases: &["new", "nw", "n"],
        signatures: &[
            &[P("width"), P("height")],
            &[P("width"), P("height"), P("color")],
        ],
    },
    CommandDescriptor {
        kind: CommandKind::Save,
        name: "Save",
        description: "Saves the current image.",
        aliases: &["save", "sv", "s"],
        signatures: &[&[P("filename")]],
    },
    CommandDescriptor {
        kind: CommandKind::Wipe,
        name: "Wipe",
        description: "Clears the bitmap.",
        aliases: &["wipe", "wp", "w"],
        signatures: &[&[]],
    },
    CommandDescriptor {
        kind: CommandKind::DrawRect,
        name: "Draw Rectangle",
        description: "Draws a rectangle.",
        aliases: &["drawrectangle", "drawrect", "dr"],
        signatures: &[RECT_STROKE],
    },
    CommandDescriptor {
        kind: CommandKind::DrawEllipse,
        name: "Draw Ellipse",
        description: "Draws an ellipse.",
        aliases: &["drawellipse", "drawelps", "de"],
        signatures: &[RECT_STROKE],
    },
    CommandDescriptor {
        kind: CommandKind::DrawLine,
        name: "Draw Line",
        description: "Draws a line.",
        aliases: &["drawline", "dl"],
        signatures: &[&[
            P("color"),
            P("lineWidth"),
            P("x0"),
            P("y0"),
            P("x1"),
            P("y1"),
        ]],
    },
    CommandDescriptor {
        kind: CommandKind::DrawPolygon,
        name: "Draw Polygon",
        description: "Draws a polygon.",
        aliases: &["drawpolygon", "drawpoly", "dp"],
        signatures: &[&[
            P("color"),
            P("lineWidth"),
            P("x0"),
            P("y0"),
            P("x1"),
            P("y1"),
            Repeat,
            P("xN"),
            P("yN"),
        ]],
    },
    CommandDescriptor {
        kind: CommandKind::Fill,
        name: "Fill",
        description: "Fills the bitmap with a given color.",
        aliases: &["fill", "fl", "fi", "f"],
        signatures: &[&[P("color")]],
    },
    CommandDescriptor {
        kind: CommandKind::FillRect,
        name: "Fill Rectangle",
        description: "Fills a rectangle.",
        aliases: &["fillrectangle", "fillrect", "fr"],
        signatures: &[RECT_FILL],
    },
    CommandDescriptor {
        kind: CommandKind::FillEllipse,
        name: "Fill Ellipse",
        description: "Fills an ellipse.",
        aliases: &["fillellipse", "fillelps", "fe"],
        signatures: &[RECT_FILL],
    },
    CommandDescriptor {
        kind: CommandKind::FillPolygon,
        name: "Fill Polygon",
        description: "Fills a polygon.",
        aliases: &["fillpolygon", "fillpoly", "fp"],
        signatures: &[&[
            P("color"),
            P("x0"),
            P("y0"),
            P("x1"),
            P("y1"),
            Repeat,
            P("xN"),
            P("yN"),
        ]],
    },
    CommandDescriptor {
        kind: CommandKind::Backdrop,
        name: "Set Backdrop",
        description: "Sets the backdrop of the display.",
        aliases: &[
            "setbackdrop",
            "backdrop",
            "setback",
            "back",
            "setdrop",
            "drop",
            "sbd",
            "bd",
            "sb",
            "b",
            "sd",
            "d",
        ],
        signatures: &[&[P("color")]],
    },
];

fn alias_index() -> &'static HashMap<&'static str, usize> {
    static INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut index = HashMap::new();
        for (position, descriptor) in COMMANDS.iter().enumerate() {
            for alias in descriptor.aliases {
                let previous = index.insert(*alias, position);
                debug_assert!(previous.is_none(), "alias '{alias}' is registered twice");
            }
        }
        index
    })
}

/// Resolves an alias (case-sensitive) to its command descriptor.
pub fn resolve(alias: &str) -> Option<&'static CommandDescriptor> {
    alias_index()
        .get(alias)
        .map(|&position| &COMMANDS[position])
}

impl CommandDescriptor {
    pub fn primary_alias(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.name)
    }

    /// Renders one usage line body, e.g. `new <width> <height>`.
    pub fn usage(&self, signature: &[Param]) -> String {
        let mut line = String::from(self.primary_alias());
        for param in signature {
            match param {
                Param::Named(name) => {
                    let _ = write!(line, " <{name}>");
                }
                Param::Repeat => line.push_str(" ..."),
            }
        }
        line
    }

    /// The description/aliases/syntax block, each line prefixed by `indent` spaces.
    pub fn help_block(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut block = String::new();
        let _ = writeln!(block, "{pad}Description: {}", self.description);
        let _ = writeln!(block, "{pad}Aliases: {}", self.aliases.join(", "));
        match self.signatures {
            [single] => {
                let _ = writeln!(block, "{pad}Syntax: {}", self.usage(single));
            }
            overloads => {
                let _ = writeln!(block, "{pad}Syntax:");
                for signature in overloads {
                    let _ = writeln!(block, "{pad}    {}", self.usage(signature));
                }
            }
        }
        block
    }
}

/// Full help listing of every command, in table order.
pub fn help_index() -> String {
    let mut text = String::from(
        "Be aware that all commands are case-sensitive.\nHere is a list of all possible commands:\n",
    );
    for descriptor in &COMMANDS {
        let _ = writeln!(text, "  - {}:", descriptor.name);
        text.push_str(&descriptor.help_block(8));
    }
    text
}

/// Help for the command reached through `alias`, if there is one.
pub fn help_for(alias: &str) -> Option<String> {
    let descriptor = resolve(alias)?;
    Some(format!("{}:\n{}", descriptor.name, descriptor.help_block(4)))
}
