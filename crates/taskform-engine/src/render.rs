//! The rendered form handed to the host.
//!
//! Everything here is plain data: labels are already interpolated, spans are
//! computed and each field carries exactly one [`Control`] describing what to
//! draw.

use indexmap::IndexMap;
use serde::Serialize;
use taskform_config::ValueOption;
use taskform_form::{ChoiceStyle, DateSubtype};

use crate::layout::{Laid, layout};

/// Which definition mode produced the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
  Schema,
  Convention,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedForm {
  pub mode: FormMode,

  /// Main section.
  pub body: Vec<RenderedRow>,

  /// Buttons below the body. Only convention forms use it.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub footer: Vec<RenderedRow>,

  /// The form has no submit control of its own; the host should add one.
  pub needs_default_submit: bool,

  /// Share links that must be opened before the form can be submitted.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub share_gate: Vec<String>,
}

impl RenderedForm {
  /// All fields of the body and footer, depth first.
  pub fn fields(&self) -> Vec<&RenderedField> {
    fn walk<'a>(rows: &'a [RenderedRow], out: &mut Vec<&'a RenderedField>) {
      for row in rows {
        for field in &row.fields {
          out.push(field);
          if let Control::Group(group) = &field.control {
            walk(&group.rows, out);
          }
        }
      }
    }

    let mut out = Vec::new();
    walk(&self.body, &mut out);
    walk(&self.footer, &mut out);
    out
  }

  /// Find a field anywhere in the form by id.
  pub fn field(&self, id: &str) -> Option<&RenderedField> {
    self.fields().into_iter().find(|f| f.id == id)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
  pub row_id: String,
  pub fields: Vec<RenderedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
  pub id: String,

  /// Name the control submits under.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  /// Columns occupied in its row.
  pub span: u32,

  pub required: bool,
  pub disabled: bool,
  pub read_only: bool,

  pub control: Control,
}

impl RenderedField {
  pub fn new(id: impl Into<String>, control: Control) -> Self {
    Self {
      id: id.into(),
      name: None,
      label: None,
      description: None,
      span: 0,
      required: false,
      disabled: false,
      read_only: false,
      control,
    }
  }
}

/// What to draw for a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
  Text(TextControl),
  Number(NumberControl),
  DateTime {
    subtype: DateSubtype,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
  },
  Select {
    options: Vec<ValueOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
  },
  Checklist(ChoiceControl),
  Radio(ChoiceControl),
  Checkbox {
    checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
  },
  File(FileControl),
  Group(GroupControl),
  Dashboard {
    slug: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    params: IndexMap<String, String>,
  },
  Button(ButtonControl),
  Markdown {
    source: String,
  },
  Html {
    source: String,
  },
  Image {
    source: String,
  },
  Video {
    source: String,
  },
  IFrame {
    url: String,
    height: u32,
  },
  Separator,
  Spacer,
  Widget(WidgetControl),
  /// A plain link, e.g. a message variable holding a url.
  Link {
    href: String,
  },
  /// A link to a transaction or address on the block explorer.
  ExplorerLink {
    /// `tx` or `address`.
    entity: String,
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<String>,
  },
  /// Choose one of the user's wallets; the choice is also written to the
  /// `mirror` input.
  WalletChooser {
    wallets: Vec<String>,
    mirror: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<String>,
  },
  QrCode {
    data: String,
  },
  /// Placeholder for a field type taskform cannot render, or a component
  /// that could not be read.
  Unsupported {
    type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
  },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextControl {
  /// `text`, `textarea`, `email`, `tel`, `markdown` or a custom type.
  pub input_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefix: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suffix: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumberControl {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefix: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suffix: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceControl {
  pub style: ChoiceStyle,
  pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
  pub label: String,
  pub value: String,
  pub required: bool,
  pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileControl {
  pub multiple: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub accept: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<String>,
  /// Submitting must wait until the upload of this field completes.
  pub deferred_upload: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupControl {
  pub show_outline: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_width: Option<String>,
  pub rows: Vec<RenderedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonControl {
  pub caption: String,
  pub behavior: ButtonBehavior,
  pub variant: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ButtonBehavior {
  Submit,
  Reset,
  Plain,
  /// Completes the task at once with only this button's value.
  Cancel,
  Link {
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
  },
}

impl ButtonBehavior {
  pub fn is_submit(&self) -> bool {
    matches!(self, ButtonBehavior::Submit)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetControl {
  /// Widget name, e.g. `token`, `nft`, `wallet`, `art`.
  pub widget: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub account: Option<String>,
}

impl WidgetControl {
  pub fn new(widget: impl Into<String>) -> Self {
    Self {
      widget: widget.into(),
      value: None,
      account: None,
    }
  }
}

/// A rendered field together with its placement hint, before layout.
pub(crate) struct Placed {
  pub row: Option<String>,
  pub columns: Option<u32>,
  pub field: RenderedField,
}

impl Laid for Placed {
  fn row(&self) -> Option<&str> {
    self.row.as_deref()
  }

  fn columns(&self) -> Option<u32> {
    self.columns
  }
}

/// Lay out placed fields and write the computed spans into them.
pub(crate) fn into_rows(placed: Vec<Placed>, total_columns: u32) -> Vec<RenderedRow> {
  layout(placed, total_columns)
    .into_iter()
    .map(|row| RenderedRow {
      row_id: row.row_id,
      fields: row
        .entries
        .into_iter()
        .map(|(placed, span)| RenderedField {
          span,
          ..placed.field
        })
        .collect(),
    })
    .collect()
}
