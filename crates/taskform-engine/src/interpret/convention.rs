use serde_json::Value;
use taskform_variables::{TypeTag, Variable, VariableStore};

use super::schema::LOGIN_CAPTION;
use crate::classify::{BucketSet, suffix_of};
use crate::config::EngineConfig;
use crate::host::HostContext;
use crate::interpolate::Interpolator;
use crate::render::{
  ButtonBehavior, ButtonControl, Control, FormMode, NumberControl, Placed, RenderedField,
  RenderedForm, TextControl, WidgetControl, into_rows,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
  Body,
  Footer,
}

/// How the variables of one bucket are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
  Art,
  Token,
  Nft,
  Image,
  Video,
  TxHash,
  AddrHash,
  Collection,
  ExternalWallet,
  Dashboard,
  WalletSelect,
  Input,
  Multiline,
  Message,
  Link,
  Stakes,
  Share,
  QrCode,
  Redirect,
  LinkProfile,
  Action,
}

/// Known buckets in render order. Buckets not listed are not shown.
const POLICIES: &[(&str, Section, Policy)] = &[
  ("art", Section::Body, Policy::Art),
  ("token", Section::Body, Policy::Token),
  ("nft", Section::Body, Policy::Nft),
  ("img", Section::Body, Policy::Image),
  ("video", Section::Body, Policy::Video),
  ("txhash", Section::Body, Policy::TxHash),
  ("addrhash", Section::Body, Policy::AddrHash),
  ("collection", Section::Body, Policy::Collection),
  ("externalwallet", Section::Body, Policy::ExternalWallet),
  ("dashboard", Section::Body, Policy::Dashboard),
  ("select", Section::Body, Policy::WalletSelect),
  ("form", Section::Body, Policy::Input),
  ("text", Section::Body, Policy::Input),
  ("formmultiline", Section::Body, Policy::Multiline),
  ("message", Section::Body, Policy::Message),
  ("link", Section::Body, Policy::Link),
  ("stakes", Section::Body, Policy::Stakes),
  ("web3", Section::Body, Policy::Input),
  ("share", Section::Body, Policy::Share),
  ("qrcode", Section::Body, Policy::QrCode),
  ("redirect", Section::Footer, Policy::Redirect),
  ("thirdweblinkprofile", Section::Footer, Policy::LinkProfile),
  ("action", Section::Footer, Policy::Action),
];

const EXTERNAL_WALLET_BUCKET: &str = "externalwallet";
const ACTION_BUCKET: &str = "action";
const SHARE_BUCKET: &str = "share";
const WITHDRAW_TIME: &str = "withdraw_time";
const MARKDOWN_SUFFIX: &str = "_markdown";
const DEFAULT_SUBMIT_CAPTION: &str = "OK";

/// Interpret variables by naming convention.
pub(super) fn interpret(
  buckets: &BucketSet,
  store: &VariableStore,
  interpolator: &Interpolator<'_>,
  host: &HostContext,
  config: &EngineConfig,
) -> RenderedForm {
  for name in buckets.names() {
    if !POLICIES.iter().any(|(bucket, _, _)| *bucket == name) {
      tracing::debug!(bucket = %name, "no policy for bucket, skipping");
    }
  }

  let renderer = Renderer {
    buckets,
    store,
    interpolator,
    host,
  };

  let mut body = Vec::new();
  let mut footer = Vec::new();

  for (bucket, section, policy) in POLICIES {
    for variable in buckets.variables(bucket) {
      let Some(field) = renderer.render(*policy, variable) else {
        continue;
      };
      let placed = Placed {
        row: Some(variable.name.clone()),
        columns: None,
        field,
      };
      match section {
        Section::Body => body.push(placed),
        Section::Footer => footer.push(placed),
      }
    }
  }

  if !buckets.contains(ACTION_BUCKET) {
    footer.push(Placed {
      row: Some("submit".to_string()),
      columns: None,
      field: default_submit(host),
    });
  }

  let share_gate = buckets
    .variables(SHARE_BUCKET)
    .filter(|v| !v.value_text().is_empty())
    .map(|v| v.name.clone())
    .collect();

  RenderedForm {
    mode: FormMode::Convention,
    body: into_rows(body, config.total_columns),
    footer: into_rows(footer, config.total_columns),
    needs_default_submit: false,
    share_gate,
  }
}

struct Renderer<'a> {
  buckets: &'a BucketSet,
  store: &'a VariableStore,
  interpolator: &'a Interpolator<'a>,
  host: &'a HostContext,
}

impl Renderer<'_> {
  /// Render one variable, or `None` when it should not be shown.
  fn render(&self, policy: Policy, variable: &Variable) -> Option<RenderedField> {
    let text = variable.value_text();
    let caption = self.interpolator.render(variable.caption());

    let mut field = RenderedField {
      name: Some(variable.name.clone()),
      label: Some(caption.clone()),
      ..RenderedField::new(&variable.name, Control::Spacer)
    };

    field.control = match policy {
      Policy::Art => Control::Widget(WidgetControl {
        value: Some(Value::String(non_empty(text)?)),
        ..WidgetControl::new("art")
      }),

      Policy::Token => Control::Widget(WidgetControl {
        value: Some(parse_json_or_text(&variable.value)),
        ..WidgetControl::new("token")
      }),

      Policy::Nft => Control::Widget(WidgetControl {
        value: Some(parse_json_or_text(&variable.value)),
        account: self
          .buckets
          .variables(EXTERNAL_WALLET_BUCKET)
          .next()
          .map(Variable::value_text)
          .filter(|a| !a.is_empty()),
        ..WidgetControl::new("nft")
      }),

      Policy::Image => Control::Image {
        source: non_empty(text)?,
      },
      Policy::Video => Control::Video {
        source: non_empty(text)?,
      },

      Policy::TxHash => self.explorer_link("tx", non_empty(text)?),
      Policy::AddrHash => self.explorer_link("address", non_empty(text)?),

      Policy::Collection => Control::Widget(WidgetControl {
        value: Some(Value::String(text)),
        ..WidgetControl::new("collection")
      }),

      Policy::ExternalWallet => Control::Widget(WidgetControl {
        account: non_empty(text),
        ..WidgetControl::new("external_wallet")
      }),

      Policy::Dashboard => {
        let (slug, query) = text.split_once('?').unwrap_or((text.as_str(), ""));
        Control::Dashboard {
          slug: slug.to_string(),
          params: url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        }
      }

      Policy::WalletSelect => {
        if self.host.wallets.is_empty() {
          return None;
        }
        field.required = variable.declared_type != TypeTag::Boolean;
        let suffix = suffix_of(&variable.name).unwrap_or(&variable.name);
        Control::WalletChooser {
          wallets: self.host.wallets.clone(),
          mirror: format!("form_{suffix}"),
          selected: non_empty(text),
        }
      }

      Policy::Input => {
        field.required = variable.declared_type != TypeTag::Boolean;
        self.input(variable, text)
      }

      Policy::Multiline => {
        field.required = true;
        Control::Text(TextControl {
          input_type: if variable.name.ends_with(MARKDOWN_SUFFIX) {
            "markdown"
          } else {
            "textarea"
          }
          .to_string(),
          default_value: Some(text),
          ..Default::default()
        })
      }

      Policy::Message => {
        if text.is_empty() && variable.label.as_deref().unwrap_or_default().is_empty() {
          return None;
        }
        field.label = self.interpolator.render_opt(variable.label.as_deref());
        Control::Markdown {
          source: self.interpolator.render(&text),
        }
      }

      Policy::Link => {
        field.label = self.interpolator.render_opt(variable.label.as_deref());
        Control::Link {
          href: non_empty(text)?,
        }
      }

      Policy::Stakes => {
        let mut data = match &variable.value {
          Value::String(s) => serde_json::from_str::<Value>(s).ok(),
          other => Some(other.clone()),
        }
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Default::default()));

        let withdraw_time = self
          .store
          .get(WITHDRAW_TIME)
          .map(|v| &v.value)
          .filter(|v| is_truthy(v));
        if let (Some(withdraw_time), Value::Object(map)) = (withdraw_time, &mut data) {
          map.insert(WITHDRAW_TIME.to_string(), withdraw_time.clone());
        }

        Control::Widget(WidgetControl {
          value: Some(data),
          ..WidgetControl::new("stakes")
        })
      }

      Policy::Share => Control::Button(ButtonControl {
        caption,
        behavior: ButtonBehavior::Link {
          href: non_empty(text)?,
          target: Some("_blank".to_string()),
        },
        variant: "primary".to_string(),
        size: Some("xl".to_string()),
        value: None,
      }),

      Policy::QrCode => Control::QrCode {
        data: non_empty(text)?,
      },

      Policy::Redirect => {
        let target = if text.starts_with('/') { "_self" } else { "_blank" };
        Control::Button(ButtonControl {
          caption,
          behavior: ButtonBehavior::Link {
            href: text,
            target: Some(target.to_string()),
          },
          variant: "primary".to_string(),
          size: Some("xl".to_string()),
          value: None,
        })
      }

      Policy::LinkProfile => Control::Widget(WidgetControl {
        value: Some(Value::String(text)),
        ..WidgetControl::new("link_profile")
      }),

      Policy::Action => Control::Button(ButtonControl {
        caption: self.button_caption(caption),
        behavior: ButtonBehavior::Submit,
        variant: "primary".to_string(),
        size: Some("xl".to_string()),
        value: Some("true".to_string()),
      }),
    };

    Some(field)
  }

  /// Editable input for `form`, `text` and `web3` variables.
  fn input(&self, variable: &Variable, text: String) -> Control {
    match &variable.declared_type {
      TypeTag::Boolean => Control::Checkbox {
        checked: is_truthy(&variable.value),
        value: Some("true".to_string()),
      },
      t if t.is_numeric() => Control::Number(NumberControl {
        default_value: Some(variable.value.clone()).filter(|v| !v.is_null()),
        ..Default::default()
      }),
      _ => Control::Text(TextControl {
        input_type: if variable.name.ends_with(MARKDOWN_SUFFIX) {
          "markdown"
        } else {
          "text"
        }
        .to_string(),
        default_value: Some(text),
        ..Default::default()
      }),
    }
  }

  fn explorer_link(&self, entity: &str, hash: String) -> Control {
    Control::ExplorerLink {
      entity: entity.to_string(),
      href: self.host.explorer_link(entity, &hash),
      hash,
    }
  }

  fn button_caption(&self, caption: String) -> String {
    if self.host.has_session {
      caption
    } else {
      LOGIN_CAPTION.to_string()
    }
  }
}

fn default_submit(host: &HostContext) -> RenderedField {
  let caption = if host.has_session {
    DEFAULT_SUBMIT_CAPTION
  } else {
    LOGIN_CAPTION
  };
  RenderedField::new(
    "submit",
    Control::Button(ButtonControl {
      caption: caption.to_string(),
      behavior: ButtonBehavior::Submit,
      variant: "primary".to_string(),
      size: Some("xl".to_string()),
      value: None,
    }),
  )
}

fn non_empty(text: String) -> Option<String> {
  (!text.is_empty()).then_some(text)
}

fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty() && s != "false",
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// A JSON document stored as a string is parsed; anything else is kept.
fn parse_json_or_text(value: &Value) -> Value {
  match value {
    Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| value.clone()),
    other => other.clone(),
  }
}
