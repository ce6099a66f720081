//! Immutable page model and its HTML rendering.

use std::fmt::Write as _;

use crate::{
    controller::{Notice, Outcome},
    form::{Field, FieldKind},
    session::SessionState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: &'static str,
    pub help: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub probability: String,
    pub credit_score: String,
    pub rating: String,
    pub rating_color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub fields: Vec<FieldView>,
    pub loan_to_income_ratio: String,
    pub notices: Vec<Notice>,
    pub result: Option<ResultView>,
}

impl PageView {
    pub fn build(title: &str, session: &SessionState, outcome: &Outcome) -> Self {
        let fields = Field::ALL
            .iter()
            .map(|&field| FieldView {
                name: session.field_key(field),
                label: field.label(),
                help: field.help(),
                kind: field.kind(),
                value: session.value(field).display(),
            })
            .collect();

        let result = outcome.result().map(|result| ResultView {
            probability: result.probability_percent(),
            credit_score: result.credit_score.to_string(),
            rating: result.rating.to_string(),
            rating_color: result.rating.color(),
        });

        Self {
            title: title.to_string(),
            fields,
            loan_to_income_ratio: format!("{:.2}", session.application().loan_to_income_ratio()),
            notices: outcome.notices(),
            result,
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(8 * 1024);
        let title = escape(&self.title);
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <div class=\"bank-logo\"><h1>{title}</h1></div>\n<hr>\n\
             <form method=\"post\" action=\"/\">\n"
        );

        // Three rows of numeric inputs; the ratio sits in the last slot of row three.
        let (numeric, choices) = self.fields.split_at(8);
        for row in numeric.chunks(3) {
            html.push_str("<div class=\"row\">\n");
            for field in row {
                render_field(&mut html, field);
            }
            if row.len() < 3 {
                let _ = writeln!(
                    html,
                    "<div class=\"custom-metric\"><h4>Loan to Income Ratio</h4><h2 id=\"loan-to-income\">{}</h2></div>",
                    self.loan_to_income_ratio
                );
            }
            html.push_str("</div>\n");
        }
        html.push_str("<div class=\"row\">\n");
        for field in choices {
            render_field(&mut html, field);
        }
        html.push_str("</div>\n");

        html.push_str(
            "<div class=\"buttons\">\
             <button type=\"submit\" name=\"action\" value=\"calculate\" class=\"primary\">Calculate Risk</button>\
             <button type=\"submit\" name=\"action\" value=\"reset\">Reset All Fields</button>\
             <button type=\"submit\" name=\"action\" value=\"update\">Update</button>\
             </div>\n</form>\n",
        );
        if let (Some(income), Some(loan)) = (self.fields.get(1), self.fields.get(2)) {
            html.push_str(
                &RATIO_SCRIPT
                    .replace("{income}", &escape(&income.name))
                    .replace("{loan}", &escape(&loan.name)),
            );
        }

        for notice in &self.notices {
            let (class, text) = match notice {
                Notice::Success(text) => ("success", text),
                Notice::Error(text) => ("error", text),
                Notice::Info(text) => ("info", text),
            };
            let _ = writeln!(html, "<div class=\"notice {class}\">{}</div>", escape(text));
        }

        if let Some(result) = &self.result {
            let _ = write!(
                html,
                "<div class=\"results-container\">\n<h3>Risk Assessment Results</h3>\n\
                 <div class=\"result-metric-box probability\"><h4>Default Probability</h4><h2>{}</h2></div>\n\
                 <div class=\"result-metric-box credit-score\"><h4>Credit Score</h4><h2>{}</h2></div>\n\
                 <div class=\"result-metric-box credit-rating\" style=\"border: 2px solid {color};\">\
                 <h4>Credit Rating</h4><h2 style=\"color: {color};\">{}</h2></div>\n</div>\n",
                escape(&result.probability),
                escape(&result.credit_score),
                escape(&result.rating),
                color = result.rating_color,
            );
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn render_field(html: &mut String, field: &FieldView) {
    let name = escape(&field.name);
    let _ = write!(
        html,
        "<label class=\"field\" title=\"{}\">{}",
        escape(field.help),
        escape(field.label)
    );
    match field.kind {
        FieldKind::Integer { min, max } => {
            let max = max.map(|max| format!(" max=\"{max}\"")).unwrap_or_default();
            let _ = write!(
                html,
                "<input type=\"number\" name=\"{name}\" value=\"{}\" min=\"{min}\"{max} step=\"1\">",
                escape(&field.value)
            );
        }
        FieldKind::Number { min } => {
            let _ = write!(
                html,
                "<input type=\"number\" name=\"{name}\" value=\"{}\" min=\"{min}\" step=\"any\">",
                escape(&field.value)
            );
        }
        FieldKind::Choice { options } => {
            let _ = write!(html, "<select name=\"{name}\">");
            for option in options {
                let selected = if *option == field.value { " selected" } else { "" };
                let _ = write!(html, "<option value=\"{option}\"{selected}>{option}</option>");
            }
            html.push_str("</select>");
        }
    }
    html.push_str("</label>\n");
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Refreshes the ratio tile as income or loan amount change, without a round trip through the form.
const RATIO_SCRIPT: &str = "<script>\n(function(){\
const income=document.querySelector('[name=\"{income}\"]');\
const loan=document.querySelector('[name=\"{loan}\"]');\
const out=document.getElementById('loan-to-income');\
if(!income||!loan||!out){return;}\
function refresh(){\
const q='income='+encodeURIComponent(income.value||0)+'&loan_amount='+encodeURIComponent(loan.value||0);\
fetch('/api/v1/ratio?'+q).then(r=>r.ok?r.json():null).then(d=>{if(d&&typeof d.loan_to_income_ratio==='number'){out.textContent=d.loan_to_income_ratio.toFixed(2);}});\
}\
income.addEventListener('input',refresh);loan.addEventListener('input',refresh);\
})();\n</script>\n";

const STYLE: &str = "\
body{background-color:#0c0d0e;color:#eee;font-family:sans-serif;margin:2rem;}\
.bank-logo h1{margin:0;color:#007bff;}\
.row{display:grid;grid-template-columns:repeat(3,1fr);gap:1rem;margin-bottom:1rem;}\
.field{display:flex;flex-direction:column;color:#ccc;gap:.25rem;}\
input,select{background-color:#2b2b2b;color:#eee;border:1px solid #444;border-radius:5px;padding:.4rem;}\
.custom-metric{background:#1a1a1a;padding:15px;border-radius:8px;text-align:center;border:2px solid #007bff;}\
.custom-metric h4,.result-metric-box h4{color:#bbb;margin:0 0 5px 0;font-size:14px;font-weight:normal;}\
.custom-metric h2{color:#007bff;margin:0;font-size:24px;}\
.buttons button{background-color:#2b2b2b;color:white;border:none;padding:10px 20px;border-radius:5px;font-size:16px;margin-right:.5rem;cursor:pointer;}\
.buttons button.primary{background-color:#007bff;}\
.notice{margin-top:1rem;padding:.75rem;border-radius:5px;}\
.notice.success{background:#173d1f;}.notice.error{background:#4a1515;}.notice.info{background:#15304a;}\
.results-container{margin-top:20px;padding:15px;background-color:#1a1a1a;border-radius:10px;border:1px solid #333;}\
.result-metric-box{background:#1a1a1a;padding:15px;border-radius:8px;text-align:center;margin:10px auto;max-width:400px;}\
.result-metric-box h2{margin:0;font-size:24px;font-weight:bold;}\
.result-metric-box.probability,.result-metric-box.credit-score{border:2px solid #007bff;}\
.result-metric-box.probability h2,.result-metric-box.credit-score h2{color:#007bff;}";

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
