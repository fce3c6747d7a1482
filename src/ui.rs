pub fn render_index(date: &str) -> String {
    INDEX_HTML.replace("{{DATE}}", date)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Macro Tracker</title>
  <style>
    :root {
      --bg: #05060a;
      --panel: rgba(24, 26, 34, 0.82);
      --ink: #e8e8ee;
      --muted: #9a9aa8;
      --green: #34d399;
      --purple: #a78bfa;
      --line: rgba(255, 255, 255, 0.09);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at 20% 0%, rgba(167, 139, 250, 0.12), transparent 45%),
        radial-gradient(circle at 80% 20%, rgba(52, 211, 153, 0.10), transparent 40%),
        var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
      display: grid;
      justify-items: center;
    }

    .app {
      width: min(960px, 100%);
      display: grid;
      gap: 20px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
      letter-spacing: 0.02em;
    }

    header .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .panel {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 18px;
      padding: 18px;
      backdrop-filter: blur(10px);
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    .card .label {
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .card .value {
      margin-top: 6px;
      font-size: 1.5rem;
      font-weight: 600;
      font-variant-numeric: tabular-nums;
    }

    .card .goal {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .bar {
      margin-top: 10px;
      height: 6px;
      border-radius: 999px;
      background: rgba(255, 255, 255, 0.08);
      overflow: hidden;
    }

    .bar span {
      display: block;
      height: 100%;
      width: 0%;
      background: linear-gradient(90deg, var(--green), var(--purple));
      transition: width 200ms ease;
    }

    .grid-2 {
      display: grid;
      gap: 20px;
      grid-template-columns: repeat(auto-fit, minmax(min(380px, 100%), 1fr));
      align-items: start;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.05rem;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      color: var(--muted);
    }

    input[type="number"],
    input[type="text"] {
      height: 40px;
      border-radius: 10px;
      border: 1px solid var(--line);
      background: rgba(5, 6, 10, 0.6);
      color: var(--ink);
      padding: 0 12px;
      font-size: 0.95rem;
      outline: none;
    }

    input:focus {
      border-color: var(--purple);
    }

    .goals-grid,
    .macros-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 10px;
    }

    .search-wrap {
      position: relative;
    }

    .results {
      position: absolute;
      z-index: 10;
      top: 100%;
      left: 0;
      right: 0;
      margin-top: 6px;
      border: 1px solid var(--line);
      border-radius: 12px;
      background: rgba(10, 11, 16, 0.97);
      max-height: 260px;
      overflow: auto;
      display: none;
    }

    .results.open {
      display: block;
    }

    .results .hint-row,
    .results button {
      display: block;
      width: 100%;
      text-align: left;
      padding: 10px 12px;
      font-size: 0.85rem;
      color: var(--ink);
      background: transparent;
      border: none;
      cursor: pointer;
    }

    .results .hint-row {
      color: var(--muted);
      cursor: default;
    }

    .results button:hover {
      background: rgba(255, 255, 255, 0.06);
    }

    .results .meta {
      color: var(--muted);
      font-size: 0.78rem;
      margin-top: 2px;
    }

    .row {
      display: flex;
      align-items: center;
      gap: 10px;
      flex-wrap: wrap;
    }

    .row .spacer {
      flex: 1;
    }

    button.action {
      border: 1px solid var(--line);
      border-radius: 10px;
      background: rgba(255, 255, 255, 0.06);
      color: var(--ink);
      height: 40px;
      padding: 0 16px;
      font-weight: 600;
      cursor: pointer;
    }

    button.action.primary {
      background: linear-gradient(90deg, rgba(52, 211, 153, 0.25), rgba(167, 139, 250, 0.25));
      border-color: rgba(167, 139, 250, 0.4);
    }

    ul.entries {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    ul.entries li {
      display: flex;
      align-items: center;
      gap: 10px;
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 10px 12px;
    }

    ul.entries .meta {
      color: var(--muted);
      font-size: 0.8rem;
      font-variant-numeric: tabular-nums;
    }

    ul.entries .remove {
      margin-left: auto;
      background: none;
      border: none;
      color: var(--muted);
      cursor: pointer;
      font-size: 1rem;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.88rem;
      font-variant-numeric: tabular-nums;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid var(--line);
    }

    th {
      color: var(--muted);
      font-weight: 500;
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
    }

    .empty {
      color: var(--muted);
      font-size: 0.9rem;
    }

    footer {
      color: var(--muted);
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header class="row">
      <div>
        <h1>Macro Tracker</h1>
        <p class="subtitle">Today: <span id="date">{{DATE}}</span></p>
      </div>
      <div class="spacer"></div>
      <button class="action" id="reset-btn" type="button">Reset day</button>
    </header>

    <section class="panel">
      <div class="cards">
        <div class="card">
          <span class="label">Calories</span>
          <div class="value"><span id="cal-total">0</span> kcal</div>
          <div class="goal">of <span id="cal-goal">0</span> kcal</div>
          <div class="bar"><span id="cal-bar"></span></div>
        </div>
        <div class="card">
          <span class="label">Protein</span>
          <div class="value"><span id="protein-total">0</span> g</div>
          <div class="goal">of <span id="protein-goal">0</span> g</div>
          <div class="bar"><span id="protein-bar"></span></div>
        </div>
        <div class="card">
          <span class="label">Carbs</span>
          <div class="value"><span id="carbs-total">0</span> g</div>
          <div class="goal">of <span id="carbs-goal">0</span> g</div>
          <div class="bar"><span id="carbs-bar"></span></div>
        </div>
        <div class="card">
          <span class="label">Fat</span>
          <div class="value"><span id="fat-total">0</span> g</div>
          <div class="goal">of <span id="fat-goal">0</span> g</div>
          <div class="bar"><span id="fat-bar"></span></div>
        </div>
      </div>
    </section>

    <div class="grid-2">
      <section class="panel">
        <h2>Daily goals</h2>
        <div class="goals-grid">
          <label>Calories
            <input type="number" min="0" step="any" id="goal-calories" />
          </label>
          <label>Protein (g)
            <input type="number" min="0" step="any" id="goal-protein" />
          </label>
          <label>Carbs (g)
            <input type="number" min="0" step="any" id="goal-carbs" />
          </label>
          <label>Fat (g)
            <input type="number" min="0" step="any" id="goal-fat" />
          </label>
        </div>
      </section>

      <section class="panel">
        <h2>Log food</h2>
        <form id="log-form" autocomplete="off">
          <div class="search-wrap">
            <label>Quick search
              <input type="text" id="food-name" placeholder="Type to search, e.g. chicken biryani" />
            </label>
            <div class="results" id="results"></div>
          </div>

          <div class="row" style="margin-top: 10px;">
            <label style="flex-direction: row; align-items: center; gap: 6px; display: flex;">
              <input type="checkbox" id="weigh-mode" />
              Weighing machine mode
            </label>
            <div class="spacer"></div>
            <span class="empty" id="base-serving"></span>
          </div>

          <label style="margin-top: 10px;">Weight (g)
            <input type="number" min="0" step="any" id="food-weight" placeholder="e.g. 150" />
          </label>

          <div class="macros-grid" style="margin-top: 10px;">
            <label>Protein (g)
              <input type="number" min="0" step="any" id="food-protein" placeholder="0" />
            </label>
            <label>Carbs (g)
              <input type="number" min="0" step="any" id="food-carbs" placeholder="0" />
            </label>
            <label>Fat (g)
              <input type="number" min="0" step="any" id="food-fat" placeholder="0" />
            </label>
          </div>

          <div class="row" style="margin-top: 12px;">
            <button class="action primary" type="submit">Add entry</button>
          </div>
        </form>
      </section>
    </div>

    <section class="panel">
      <h2>Today's log</h2>
      <ul class="entries" id="entries"></ul>
      <p class="empty" id="entries-empty">Nothing logged yet.</p>
    </section>

    <section class="panel">
      <h2>History</h2>
      <table id="history-table">
        <thead>
          <tr><th>Date</th><th>kcal</th><th>P</th><th>C</th><th>F</th><th>Entries</th></tr>
        </thead>
        <tbody id="history-body"></tbody>
      </table>
      <p class="empty" id="history-empty">No history yet. Log food for a few days and come back.</p>
    </section>

    <footer>Calories are always derived as 4P + 4C + 9F. Data lives in this server's data directory.</footer>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const round1 = (v) => Math.round(v * 10) / 10;
    const fmt1 = (v) => round1(v).toFixed(1);

    let base = { weight: null, protein: 0, carbs: 0, fat: 0 };
    let searchTimer = null;

    const setCard = (prefix, total, goal) => {
      $(prefix + '-total').textContent = fmt1(total);
      $(prefix + '-goal').textContent = fmt1(goal);
      const pct = goal > 0 ? Math.min(100, (total / goal) * 100) : 0;
      $(prefix + '-bar').style.width = pct + '%';
    };

    const renderDay = (day) => {
      $('date').textContent = day.dateKey;
      setCard('cal', day.totals.calories, day.goals.calories);
      setCard('protein', day.totals.protein, day.goals.protein);
      setCard('carbs', day.totals.carbs, day.goals.carbs);
      setCard('fat', day.totals.fat, day.goals.fat);

      for (const field of ['calories', 'protein', 'carbs', 'fat']) {
        const input = $('goal-' + field);
        if (document.activeElement !== input) {
          input.value = day.goals[field];
        }
      }

      const list = $('entries');
      list.innerHTML = '';
      for (const entry of day.entries) {
        const li = document.createElement('li');
        const name = document.createElement('span');
        name.textContent = entry.name;
        const meta = document.createElement('span');
        meta.className = 'meta';
        const kcal = entry.protein * 4 + entry.carbs * 4 + entry.fat * 9;
        meta.textContent = `P ${fmt1(entry.protein)} C ${fmt1(entry.carbs)} F ${fmt1(entry.fat)} | ${fmt1(kcal)} kcal`;
        const remove = document.createElement('button');
        remove.type = 'button';
        remove.className = 'remove';
        remove.textContent = '✕';
        remove.addEventListener('click', async () => {
          const res = await fetch('/api/entries/' + encodeURIComponent(entry.id), { method: 'DELETE' });
          if (res.ok) renderDay(await res.json());
        });
        li.append(name, meta, remove);
        list.appendChild(li);
      }
      $('entries-empty').style.display = day.entries.length ? 'none' : 'block';
    };

    const renderHistory = (rows) => {
      const body = $('history-body');
      body.innerHTML = '';
      for (const row of rows) {
        const tr = document.createElement('tr');
        for (const cell of [row.dateKey, fmt1(row.calories), fmt1(row.protein), fmt1(row.carbs), fmt1(row.fat), row.entryCount]) {
          const td = document.createElement('td');
          td.textContent = cell;
          tr.appendChild(td);
        }
        body.appendChild(tr);
      }
      $('history-table').style.display = rows.length ? 'table' : 'none';
      $('history-empty').style.display = rows.length ? 'none' : 'block';
    };

    const loadDay = async () => {
      const res = await fetch('/api/day');
      if (res.ok) renderDay(await res.json());
    };

    const loadHistory = async () => {
      const res = await fetch('/api/history');
      if (res.ok) renderHistory(await res.json());
    };

    const refresh = () => Promise.all([loadDay(), loadHistory()]);

    const searchFoods = async (q) => {
      try {
        const res = await fetch('/api/search?query=' + encodeURIComponent(q));
        if (!res.ok) return [];
        const data = await res.json();
        return Array.isArray(data) ? data : [];
      } catch {
        return [];
      }
    };

    const closeResults = () => {
      $('results').classList.remove('open');
      $('results').innerHTML = '';
    };

    const pickFood = (food) => {
      const baseWeight = food.baseWeightGrams && food.baseWeightGrams > 0 ? food.baseWeightGrams : null;
      base = { weight: baseWeight, protein: food.protein, carbs: food.carbs, fat: food.fat };
      $('food-name').value = food.brand ? `${food.name} — ${food.brand}` : food.name;
      $('food-protein').value = fmt1(food.protein);
      $('food-carbs').value = fmt1(food.carbs);
      $('food-fat').value = fmt1(food.fat);
      if (baseWeight !== null) $('food-weight').value = fmt1(baseWeight);
      $('base-serving').textContent = baseWeight !== null ? `Base serving: ${fmt1(baseWeight)} g` : '';
      closeResults();
    };

    const renderResults = (foods) => {
      const box = $('results');
      box.innerHTML = '';
      if (!foods.length) {
        const hint = document.createElement('div');
        hint.className = 'hint-row';
        hint.textContent = 'No results.';
        box.appendChild(hint);
      }
      for (const food of foods) {
        const btn = document.createElement('button');
        btn.type = 'button';
        const kcal = food.protein * 4 + food.carbs * 4 + food.fat * 9;
        const title = document.createElement('div');
        title.textContent = food.brand ? `${food.name} · ${food.brand}` : food.name;
        const meta = document.createElement('div');
        meta.className = 'meta';
        meta.textContent = `P ${fmt1(food.protein)}g · C ${fmt1(food.carbs)}g · F ${fmt1(food.fat)}g · ${fmt1(kcal)} kcal` +
          (food.serving ? ` · ${food.serving}` : '');
        btn.append(title, meta);
        btn.addEventListener('click', () => pickFood(food));
        box.appendChild(btn);
      }
      box.classList.add('open');
    };

    // only the latest keystroke burst fires a request
    $('food-name').addEventListener('input', () => {
      const q = $('food-name').value.trim();
      window.clearTimeout(searchTimer);
      if (q.length < 2) {
        closeResults();
        return;
      }
      searchTimer = window.setTimeout(async () => {
        renderResults(await searchFoods(q));
      }, 220);
    });

    document.addEventListener('mousedown', (e) => {
      if (!$('results').contains(e.target) && e.target !== $('food-name')) closeResults();
    });

    const applyScaling = () => {
      if (!$('weigh-mode').checked) return;
      const w = parseFloat($('food-weight').value);
      if (!Number.isFinite(w) || w < 0 || !base.weight || base.weight <= 0) return;
      const factor = w / base.weight;
      $('food-protein').value = fmt1(base.protein * factor);
      $('food-carbs').value = fmt1(base.carbs * factor);
      $('food-fat').value = fmt1(base.fat * factor);
    };

    $('food-weight').addEventListener('input', applyScaling);
    $('weigh-mode').addEventListener('change', applyScaling);

    const parseMacro = (id) => {
      const n = parseFloat($(id).value);
      return Number.isFinite(n) && n >= 0 ? n : 0;
    };

    $('log-form').addEventListener('submit', async (e) => {
      e.preventDefault();
      const name = $('food-name').value.trim();
      if (!name) return;
      const res = await fetch('/api/entries', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          name,
          protein: parseMacro('food-protein'),
          carbs: parseMacro('food-carbs'),
          fat: parseMacro('food-fat'),
        }),
      });
      if (res.ok) {
        renderDay(await res.json());
        for (const id of ['food-name', 'food-protein', 'food-carbs', 'food-fat', 'food-weight']) {
          $(id).value = '';
        }
        base = { weight: null, protein: 0, carbs: 0, fat: 0 };
        $('base-serving').textContent = '';
        $('weigh-mode').checked = false;
        closeResults();
      }
    });

    for (const field of ['calories', 'protein', 'carbs', 'fat']) {
      $('goal-' + field).addEventListener('change', async () => {
        const v = parseFloat($('goal-' + field).value);
        const res = await fetch('/api/goals', {
          method: 'PUT',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ [field]: v }),
        });
        if (res.ok) renderDay(await res.json());
      });
    }

    $('reset-btn').addEventListener('click', async () => {
      const res = await fetch('/api/day/reset', { method: 'POST' });
      if (res.ok) renderDay(await res.json());
    });

    refresh();
    window.setInterval(refresh, 60000);
  </script>
</body>
</html>
"#;
