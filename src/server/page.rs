//! Embedded console page.
//!
//! Single-page UI served from the binary: one question input, one button,
//! and panels for the generated SQL, the result table, and the answer.
//! Pure HTML/CSS/JS, no external assets.

pub const CONSOLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>pgchat</title>
<style>
  :root { --bg: #0d1117; --surface: #161b22; --border: #30363d; --text: #c9d1d9; --accent: #58a6ff; --green: #3fb950; --red: #f85149; }
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: var(--bg); color: var(--text); }
  .header { background: var(--surface); border-bottom: 1px solid var(--border); padding: 12px 24px; display: flex; align-items: baseline; gap: 12px; }
  .header h1 { font-size: 18px; color: var(--accent); }
  .header .sub { font-size: 12px; color: #8b949e; }
  .content { max-width: 900px; margin: 0 auto; padding: 24px; }
  .ask-bar { display: flex; gap: 8px; margin-bottom: 24px; }
  .ask-bar input { flex: 1; background: var(--surface); border: 1px solid var(--border); color: var(--text); padding: 10px 14px; border-radius: 6px; font-size: 15px; }
  .btn { background: var(--accent); color: #fff; border: none; padding: 10px 18px; border-radius: 6px; cursor: pointer; font-size: 14px; }
  .btn:disabled { opacity: 0.5; cursor: default; }
  .section { margin-bottom: 24px; display: none; }
  .section h2 { font-size: 13px; color: #8b949e; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 8px; }
  pre { background: var(--surface); border: 1px solid var(--border); padding: 12px; border-radius: 6px; overflow-x: auto; font-size: 13px; font-family: monospace; }
  table { width: 100%; border-collapse: collapse; background: var(--surface); border: 1px solid var(--border); border-radius: 6px; overflow: hidden; }
  th, td { text-align: left; padding: 7px 12px; border-bottom: 1px solid var(--border); font-size: 13px; }
  th { color: #8b949e; font-weight: 600; text-transform: uppercase; font-size: 11px; }
  .answer { background: var(--surface); border: 1px solid var(--border); border-left: 3px solid var(--green); padding: 14px; border-radius: 6px; font-size: 15px; line-height: 1.5; }
  .error { background: var(--surface); border: 1px solid var(--red); color: var(--red); padding: 14px; border-radius: 6px; font-size: 14px; }
  .hint { color: #8b949e; font-size: 13px; }
</style>
</head>
<body>
<div class="header">
  <h1>pgchat</h1>
  <span class="sub">ask your PostgreSQL database a question</span>
</div>
<div class="content">
  <div class="ask-bar">
    <input id="question" type="text" placeholder="e.g. Top 5 best selling tracks" autofocus>
    <button id="ask" class="btn">Get Answer</button>
  </div>
  <p id="status" class="hint"></p>
  <div id="error-section" class="section"><div id="error" class="error"></div></div>
  <div id="sql-section" class="section"><h2>Generated SQL</h2><pre id="sql"></pre></div>
  <div id="table-section" class="section"><h2>Result</h2><table id="table"></table></div>
  <div id="answer-section" class="section"><h2>Answer</h2><div id="answer" class="answer"></div></div>
</div>
<script>
const $ = (id) => document.getElementById(id);
const show = (id, on) => { $(id).style.display = on ? 'block' : 'none'; };

async function ask() {
  const question = $('question').value.trim();
  if (!question) return;

  $('ask').disabled = true;
  $('status').textContent = 'Thinking...';
  ['error-section', 'sql-section', 'table-section', 'answer-section'].forEach(id => show(id, false));

  try {
    const res = await fetch('/api/ask', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ question }),
    });
    const body = await res.json();

    if (!res.ok) {
      $('error').textContent = body.error || ('request failed: ' + res.status);
      show('error-section', true);
      return;
    }

    $('sql').textContent = body.sql;
    show('sql-section', true);

    const table = $('table');
    table.innerHTML = '';
    const head = table.insertRow();
    body.table.columns.forEach(c => { const th = document.createElement('th'); th.textContent = c; head.appendChild(th); });
    body.table.rows.forEach(r => { const tr = table.insertRow(); r.forEach(v => { tr.insertCell().textContent = v; }); });
    show('table-section', true);

    $('answer').textContent = body.answer;
    show('answer-section', true);
  } catch (e) {
    $('error').textContent = String(e);
    show('error-section', true);
  } finally {
    $('ask').disabled = false;
    $('status').textContent = '';
  }
}

$('ask').addEventListener('click', ask);
$('question').addEventListener('keydown', (e) => { if (e.key === 'Enter') ask(); });
</script>
</body>
</html>
"#;
