/*!

This is the long-form manual for `ceasa_matrix` and `ceasadash`.

## Input format

The evaluation matrix is a spreadsheet (Excel `.xlsx`, or a `.csv` export of
the same sheet) with two header rows.

The first header row names a column group. It is either a region
(`Belem/PA`, `São Luis/MA`, `CEAGESP/SP`, `Mais Nutrição/CE`, `PRODAL/MG`,
`Curitiba/PR`, `GLOBAL`) or `GERAL` for the columns shared by all the regions.
Merged cells are supported: an empty cell continues the group on its left.

The second header row names the metric. For every region, the following
metrics are read:
* `<region> pontuação` the score of each activity
* `Pontuação no Bloco ` (with the trailing space) the score of the block, on
  the first row of the block
* `<region> %` the percentage of the block, on the first row of the block
* `% em relação ao Total do Bloco` and other `%` columns, used by the charts
  and the exported table

The `GERAL` group may contain `Bloco`, `Atividade` and
`Pontuação Maxima por Bloco`. Only the first row of each block needs to fill
`Bloco`; the value is carried down to the following rows when loading.

After the headers, there is one row per activity, in the order of the blocks:

| Block     | Activities |
|-----------|------------|
| `BLOCO 1` | Articulação, Triagem e Logística, Enriquecimento da captação |
| `BLOCO 2` | Estrutura, Processos |
| `BLOCO 3` | Aporte Inicial, Custos de Operação |
| `BLOCO 4` | Sustentabilidade do Banco de Alimentos, Sustentabilidade da Ceasa |
| `BLOCO 5` | Resultados de Eficiência |
| `BLOCO 6` | Edificação |

The position of the rows is what matters: the content of the `Bloco` and
`Atividade` columns is not used to find the scores. A sheet with rows in a
different order produces wrong scores without any error.

## Column matching

Columns are looked up by comparing normalized names: accents are removed,
letters are lowercased and spaces are dropped. A column matches when its name
(group and metric joined) contains both the region and the metric. If several
columns match, the leftmost one is used.

## Errors

A region and block pair that cannot be read (missing column, empty or
non-numeric cell) is skipped with a warning. An empty activity or block score
is not read as a missing value: the whole pair is left out, where a spreadsheet
tool reading blanks as NaN would still show the row. The percentage is
optional and never causes a pair to be skipped. If no pair at all can be
read, the run stops.

A score written as `NaN` is read as a number. Such a record is kept, but it
never wins the best or worst place of its block and is sorted after the other
records.

## Command line

```bash
ceasadash -i Matriz_Avaliativa_Ceasas.xlsx --out stdout
ceasadash -i matriz.csv --input-type csv --region "Belem/PA" --region GLOBAL --csv-out tabela.csv
ceasadash --config dashboard.json --reference expected_summary.json
```

A configuration file has the following structure. All the fields are optional
except `input.filePath`:

```json
{
  "input": { "filePath": "Matriz_Avaliativa_Ceasas.xlsx", "provider": "xlsx", "excelWorksheetName": "Matriz" },
  "filters": { "regions": ["Belem/PA"], "blocks": ["BLOCO 1"], "activities": ["Estrutura"], "minScore": 0, "maxScore": 20 },
  "output": { "summaryPath": "summary.json", "csvPath": "tabela.csv", "percentageType": "% em relação ao Bloco", "percentageBlock": "BLOCO 1" }
}
```
*/
