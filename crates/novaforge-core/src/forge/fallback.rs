//! Built-in artifacts used when the model's output is missing or unusable.

/// Page written when the create call to the model fails outright.
pub const EMPTY_SHELL_HTML: &str = "<html><body><ul id='data-list'></ul></body></html>";

/// Scripts shorter than this (after trimming) are replaced by
/// [`FALLBACK_SCRIPT`].
pub const MIN_SCRIPT_LEN: usize = 10;

/// Reference client script: loads entries from the data endpoint on
/// DOM-ready, renders them into `#data-list`, and posts new entries from
/// `#data-form`.
pub const FALLBACK_SCRIPT: &str = r#"const API_URL = "http://localhost:5000/api/data";

document.addEventListener("DOMContentLoaded", () => {
    loadData();
    const form = document.getElementById("data-form");
    if (form) form.addEventListener("submit", submitData);
});

async function loadData() {
    try {
        const res = await fetch(API_URL);
        if (!res.ok) throw new Error();
        const data = await res.json();
        render(data);
    } catch {
        showError("Backend server is not running");
    }
}

async function submitData(e) {
    e.preventDefault();
    const input = document.getElementById("content");
    if (!input.value) return;
    try {
        await fetch(API_URL, {
            method: "POST",
            headers: {"Content-Type":"application/json"},
            body: JSON.stringify({content: input.value})
        });
        input.value = "";
        loadData();
    } catch {
        showError("Cannot save. Backend down.");
    }
}

function render(data) {
    const list = document.getElementById("data-list");
    list.innerHTML = "";
    data.forEach(r => {
        const li = document.createElement("li");
        li.textContent = r[1];
        list.appendChild(li);
    });
}

function showError(msg) {
    document.getElementById("data-list").innerHTML =
        `<li style="color:red">${msg}</li>`;
}
"#;

/// Keep an extracted script if it is substantial, otherwise substitute the
/// reference script. Returns the script and whether the fallback was used.
pub fn script_or_fallback(extracted: Option<&str>) -> (String, bool) {
    match extracted.map(str::trim) {
        Some(script) if script.chars().count() >= MIN_SCRIPT_LEN => (script.to_string(), false),
        _ => (FALLBACK_SCRIPT.to_string(), true),
    }
}

/// SQLite file name the backend template stores its rows in.
///
/// Derived from the project name as typed by the user, not the sanitized
/// directory name.
pub fn backend_db_name(raw_project_name: &str) -> String {
    format!("{}.db", raw_project_name.to_lowercase().replace(' ', "_"))
}

/// Server script written alongside every new project: a small Flask app
/// exposing `GET/POST /api/data` over a single SQLite table.
pub fn backend_template(raw_project_name: &str) -> String {
    let db = backend_db_name(raw_project_name);
    format!(
        r#"from flask import Flask, jsonify, request
from flask_cors import CORS
import sqlite3

app = Flask(__name__)
CORS(app)
DB = '{db}'

def init():
    c = sqlite3.connect(DB)
    c.execute("CREATE TABLE IF NOT EXISTS data (id INTEGER PRIMARY KEY, content TEXT)")
    c.commit()
    c.close()

init()

@app.route('/api/data', methods=['GET'])
def get_data():
    c = sqlite3.connect(DB)
    rows = c.execute("SELECT * FROM data").fetchall()
    c.close()
    return jsonify(rows)

@app.route('/api/data', methods=['POST'])
def add_data():
    content = request.json.get("content")
    c = sqlite3.connect(DB)
    c.execute("INSERT INTO data (content) VALUES (?)", (content,))
    c.commit()
    c.close()
    return jsonify(success=True)

if __name__ == "__main__":
    app.run(debug=True)
"#
    )
}
