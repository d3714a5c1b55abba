pub const GLOBAL_CSS: &str = r#"
:root {
  --bg: #0b0d10;
  --bg-elev-1: #12151a;
  --bg-elev-2: #181c23;
  --panel: #10141a;
  --border: rgba(255, 255, 255, 0.08);
  --border-strong: rgba(255, 255, 255, 0.16);
  --text: #e8e6e1;
  --text-dim: #c2bdb4;
  --text-muted: #837f77;
  --accent: #d2a24c;
  --accent-strong: #e6b860;
  --surface-hover: rgba(255, 255, 255, 0.05);
  --surface-active: rgba(255, 255, 255, 0.1);
  --shadow-soft: 0 14px 42px rgba(0, 0, 0, 0.38);
  --radius: 10px;
  --radius-pill: 999px;
  --space-1: 4px;
  --space-2: 8px;
  --space-3: 12px;
  --space-4: 16px;
  --space-6: 24px;
  --font-body: "Inter", "SF Pro Text", system-ui, -apple-system, sans-serif;
  --font-mono: "JetBrains Mono", "SFMono-Regular", ui-monospace, monospace;
  --font-size-xs: 11px;
  --font-size-sm: 13px;
  --font-size-md: 15px;
  --transition: 140ms ease-out;
}

* { box-sizing: border-box; }
html, body {
  padding: 0;
  margin: 0;
  background: var(--bg);
  color: var(--text);
  font-family: var(--font-body);
  font-size: var(--font-size-sm);
  line-height: 1.4;
  letter-spacing: 0.01em;
  min-height: 100%;
}

a { color: var(--accent); text-decoration: none; }
a:hover { color: var(--accent-strong); }

button {
  font-family: var(--font-body);
}

input, select {
  background: var(--bg-elev-1);
  border: 1px solid var(--border);
  color: var(--text);
  padding: var(--space-2) var(--space-3);
  border-radius: var(--radius);
  font-size: var(--font-size-sm);
  outline: none;
  transition: border-color var(--transition), background var(--transition);
}

input:focus, select:focus {
  border-color: var(--accent);
}

.catalog-shell {
  max-width: 1100px;
  margin: 0 auto;
  padding: var(--space-4);
  display: flex;
  flex-direction: column;
  gap: var(--space-3);
}

.panel {
  background: var(--panel);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  box-shadow: var(--shadow-soft);
}

.catalog-topbar {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: var(--space-3) var(--space-4);
}

.brand-mark {
  display: flex;
  align-items: baseline;
  gap: var(--space-2);
}

.brand-title {
  font-size: var(--font-size-md);
  font-weight: 600;
}

.pill {
  padding: 2px var(--space-2);
  border-radius: var(--radius-pill);
  border: 1px solid var(--border);
  font-size: var(--font-size-xs);
  color: var(--text-muted);
  background: transparent;
  cursor: default;
}

.pill.selectable {
  cursor: pointer;
  color: var(--text-dim);
  transition: background var(--transition), color var(--transition);
}

.view-toggle {
  display: flex;
  gap: var(--space-2);
}

.pill.selectable:hover { background: var(--surface-hover); }
.pill.selectable.active {
  background: var(--surface-active);
  border-color: var(--border-strong);
  color: var(--text);
}

.catalog-controls {
  display: flex;
  align-items: flex-end;
  gap: var(--space-3);
  padding: var(--space-3) var(--space-4);
  flex-wrap: wrap;
}

.control-stack {
  display: flex;
  flex-direction: column;
  gap: var(--space-1);
}

.input-label {
  font-size: var(--font-size-xs);
  color: var(--text-muted);
  text-transform: uppercase;
  letter-spacing: 0.08em;
}

.control-spacer { flex: 1; }

.table-count-wrap {
  color: var(--text-muted);
  font-size: var(--font-size-sm);
  padding-bottom: var(--space-2);
}

.table-count {
  color: var(--text);
  font-family: var(--font-mono);
}

.view { display: none; }
.view.active { display: block; }

.catalog-table-wrap {
  overflow-x: auto;
  padding: var(--space-2);
}

.catalog-table {
  width: 100%;
  border-collapse: collapse;
}

.catalog-table th {
  text-align: left;
  font-size: var(--font-size-xs);
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--text-muted);
  padding: var(--space-2) var(--space-3);
  border-bottom: 1px solid var(--border-strong);
  white-space: nowrap;
}

.catalog-table td {
  padding: var(--space-2) var(--space-3);
  border-bottom: 1px solid var(--border);
  vertical-align: top;
}

.catalog-table tbody tr:hover { background: var(--surface-hover); }

.catalog-table .empty { color: var(--text-muted); }

.table-note {
  color: var(--text-muted);
  text-align: center;
  padding: var(--space-6) var(--space-3);
}

.machine-link { white-space: nowrap; }

.pivot-panel { padding: var(--space-4); }

.pivot-list {
  display: flex;
  flex-direction: column;
  gap: var(--space-3);
}

.pivot-item { display: flex; flex-direction: column; gap: var(--space-1); }

.pivot-header {
  display: flex;
  justify-content: space-between;
  align-items: baseline;
}

.pivot-label { font-weight: 600; }

.pivot-value {
  font-family: var(--font-mono);
  color: var(--text-dim);
}

.pivot-bar-container {
  background: var(--bg-elev-1);
  border-radius: var(--radius-pill);
  overflow: hidden;
  height: 10px;
}

.pivot-bar {
  background: var(--accent);
  height: 100%;
  border-radius: var(--radius-pill);
  transition: width var(--transition);
}

.pivot-details { color: var(--text-muted); font-size: var(--font-size-xs); }

.pivot-empty {
  color: var(--text-muted);
  text-align: center;
  padding: var(--space-6);
}

.catalog-footer {
  color: var(--text-muted);
  font-size: var(--font-size-xs);
  padding: var(--space-2) var(--space-4);
  display: flex;
  justify-content: flex-end;
}
"#;
