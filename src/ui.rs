use crate::models::{Location, Pandemic};

pub fn render_index(pandemics: &[Pandemic], locations: &[Location]) -> String {
    let pandemic_options: String = pandemics
        .iter()
        .map(|pandemic| {
            let label = pandemic
                .name
                .clone()
                .unwrap_or_else(|| format!("Pandemic #{}", pandemic.id));
            format!("<option value=\"{}\">{}</option>", pandemic.id, escape(&label))
        })
        .collect();

    let location_options: String = locations
        .iter()
        .map(|location| {
            let label = location
                .country
                .clone()
                .unwrap_or_else(|| format!("Location #{}", location.id));
            format!("<option value=\"{}\">{}</option>", location.id, escape(&label))
        })
        .collect();

    INDEX_HTML
        .replace("{{PANDEMIC_OPTIONS}}", &pandemic_options)
        .replace("{{LOCATION_OPTIONS}}", &location_options)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Pandemic Dashboard</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --ink: #1f2a33;
      --muted: #6b7780;
      --card: #ffffff;
      --cases: #4bc0c0;
      --deaths: #ff6384;
      --new-cases: #36a2eb;
      --new-deaths: #ff9f40;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 32px 20px 48px;
      display: grid;
      gap: 24px;
    }

    h1 { margin: 0; font-size: 2rem; }

    .selectors {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    select, .export {
      padding: 10px 14px;
      border-radius: 10px;
      border: 1px solid #d5dbe0;
      background: white;
      font-size: 0.95rem;
      color: var(--ink);
      text-decoration: none;
    }

    .export { background: var(--ink); color: white; border: none; }

    .error {
      display: none;
      padding: 12px 16px;
      border-radius: 10px;
      background: #fde2e2;
      border: 1px solid #f5a3a3;
      color: #9b1c1c;
    }

    .error.visible { display: block; }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 18px;
      box-shadow: 0 8px 24px rgba(31, 42, 51, 0.06);
    }

    .card .label { font-size: 0.85rem; color: var(--muted); }
    .card .value { font-size: 1.6rem; font-weight: 700; margin-top: 6px; }
    .card .scope { font-size: 0.8rem; color: var(--muted); margin-top: 4px; }

    #chart { width: 100%; height: 320px; display: block; }
    .chart-label { fill: var(--muted); font-size: 11px; }
    .chart-grid { stroke: rgba(31, 42, 51, 0.08); }
    .series { fill: none; stroke-width: 2.5; }
  </style>
</head>
<body>
  <main>
    <h1>Pandemic Dashboard</h1>

    <section class="selectors">
      <select id="pandemic">{{PANDEMIC_OPTIONS}}</select>
      <select id="location">
        <option value="global">Global</option>
        {{LOCATION_OPTIONS}}
      </select>
      <select id="timeframe">
        <option value="all">Whole period</option>
        <option value="early">Early phase</option>
        <option value="peak">Peak</option>
        <option value="decline">Decline</option>
      </select>
      <a id="export" class="export" href="#">Export JSON</a>
    </section>

    <div id="error" class="error"></div>

    <section class="cards">
      <div class="card"><div class="label">Confirmed cases</div><div class="value" id="total_cases">0</div><div class="scope"></div></div>
      <div class="card"><div class="label">Deaths</div><div class="value" id="total_deaths">0</div><div class="scope"></div></div>
      <div class="card"><div class="label">New cases</div><div class="value" id="new_cases">0</div><div class="scope"></div></div>
      <div class="card"><div class="label">New deaths</div><div class="value" id="new_deaths">0</div><div class="scope"></div></div>
    </section>

    <section class="card">
      <svg id="chart" viewBox="0 0 900 320" role="img" aria-label="Cases and deaths over time"></svg>
    </section>
  </main>

  <script>
    const SERIES = [
      { key: 'total_cases', color: 'var(--cases)' },
      { key: 'total_deaths', color: 'var(--deaths)' },
      { key: 'new_cases', color: 'var(--new-cases)' },
      { key: 'new_deaths', color: 'var(--new-deaths)' }
    ];

    const pandemicEl = document.getElementById('pandemic');
    const locationEl = document.getElementById('location');
    const timeframeEl = document.getElementById('timeframe');
    const exportEl = document.getElementById('export');
    const errorEl = document.getElementById('error');
    const chartEl = document.getElementById('chart');

    const query = () => {
      const params = new URLSearchParams({
        pandemic: pandemicEl.value,
        location: locationEl.value,
        timeframe: timeframeEl.value
      });
      return params.toString();
    };

    const showError = (message) => {
      errorEl.textContent = message || '';
      errorEl.classList.toggle('visible', Boolean(message));
    };

    const renderCards = (view) => {
      const scope = view.location === null || view.location === undefined
        ? 'Global data'
        : `Data for ${locationEl.options[locationEl.selectedIndex].text}`;
      SERIES.forEach(({ key }) => {
        const el = document.getElementById(key);
        el.textContent = Number(view.statistics[key] || 0).toLocaleString();
        el.nextElementSibling.textContent = scope;
      });
    };

    const renderChart = (timeline) => {
      if (!timeline.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }
      const width = 900, height = 320, padX = 60, padY = 30;
      const max = Math.max(1, ...timeline.flatMap((p) => SERIES.map(({ key }) => p[key])));
      const step = timeline.length > 1 ? (width - padX * 2) / (timeline.length - 1) : 0;
      const x = (i) => padX + i * step;
      const y = (v) => height - padY - (v / max) * (height - padY * 2);

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y(value)}" x2="${width - padX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${padX - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value).toLocaleString()}</text>`;
      }

      const lines = SERIES.map(({ key, color }) => {
        const d = timeline.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(1)} ${y(p[key]).toFixed(1)}`).join(' ');
        return `<path class="series" stroke="${color}" d="${d}" />`;
      }).join('');

      const every = Math.max(1, Math.ceil(timeline.length / 8));
      const labels = timeline.map((p, i) => i % every === 0
        ? `<text class="chart-label" x="${x(i)}" y="${height - 8}" text-anchor="middle">${p.date}</text>`
        : '').join('');

      chartEl.innerHTML = grid + lines + labels;
    };

    const refresh = async () => {
      if (!pandemicEl.value) {
        showError('No pandemic available');
        return;
      }
      exportEl.href = `/api/export?${query()}`;
      const res = await fetch(`/api/dashboard?${query()}`);
      if (!res.ok) {
        const body = await res.json().catch(() => ({}));
        throw new Error(body.error || 'Unable to load statistics');
      }
      const view = await res.json();
      showError(view.error);
      renderCards(view);
      renderChart(view.timeline);
    };

    [pandemicEl, locationEl, timeframeEl].forEach((el) =>
      el.addEventListener('change', () => refresh().catch((err) => showError(err.message)))
    );

    refresh().catch((err) => showError(err.message));
  </script>
</body>
</html>
"##;
